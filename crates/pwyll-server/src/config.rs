//! Server configuration.

use std::net::SocketAddr;

/// Configuration for the maintenance server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Bearer token required on maintenance routes. `None` means auth is
    /// disabled (localhost mode).
    pub auth_token: Option<String>,

    /// Record kind swept by the expired-session route. An empty kind falls
    /// back to the session layer's default.
    pub kind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8081".parse().unwrap(),
            auth_token: None,
            kind: String::new(),
        }
    }
}

impl ServerConfig {
    /// Create a new server config with an optional auth token.
    /// Pass `None` to disable authentication (localhost mode).
    pub fn new(auth_token: Option<String>) -> Self {
        Self {
            auth_token,
            ..Self::default()
        }
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set the record kind to sweep.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }
}
