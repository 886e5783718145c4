//! Internal maintenance HTTP surface for the session stores.
//!
//! Exposes the bulk expired-session sweep to a trusted periodic scheduler
//! plus a health check. The route shape here is deployment configuration;
//! the behavior lives in `pwyll-session`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use pwyll_server::{Server, ServerConfig};
//! use pwyll_session::SqliteRecordStore;
//!
//! let records = Arc::new(SqliteRecordStore::open("sessions.db")?);
//! let config = ServerConfig::new(Some("sweep-token".to_string()));
//! Server::new(records, config).run().await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use auth::auth_middleware;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use routes::{SweepResponse, health_routes, maintenance_routes};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use pwyll_session::RecordStore;

/// The maintenance HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a new server over the given record backend.
    pub fn new(records: Arc<dyn RecordStore>, config: ServerConfig) -> Self {
        Self {
            state: AppState::new(records, config),
        }
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        Router::new()
            // Health route (no auth required)
            .merge(routes::health_routes())
            // Maintenance routes sit behind the bearer token
            .nest("/internal", routes::maintenance_routes(self.state.clone()))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        let router = self.router();

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        info!(%addr, "maintenance server listening");

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        Ok(())
    }
}
