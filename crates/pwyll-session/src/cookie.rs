//! The cookie sealing boundary.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::error::{Result, SessionError};

/// Authenticated encoding of session IDs into cookie values.
///
/// Real implementations sign (and optionally encrypt) the ID with one or
/// more rotating key pairs — trying the oldest-compatible pair first on
/// decode — and live in the surrounding cookie framework. This crate only
/// defines the seam; unsealing failures surface as
/// [`SessionError::Authentication`].
pub trait CookieSealer: Send + Sync {
    /// Encode `id` into the value of the cookie named `name`.
    fn seal(&self, name: &str, id: &str) -> Result<String>;

    /// Recover the session ID from a cookie value, verifying authenticity.
    fn unseal(&self, name: &str, value: &str) -> Result<String>;
}

/// A reversible, unsigned sealer for tests and local development.
///
/// This offers no tamper resistance whatsoever: a client can forge any
/// session ID. Never use it in a real deployment.
#[derive(Debug, Clone, Default)]
pub struct PlainCookieSealer;

impl PlainCookieSealer {
    /// Create a new plain sealer.
    pub fn new() -> Self {
        Self
    }
}

impl CookieSealer for PlainCookieSealer {
    fn seal(&self, name: &str, id: &str) -> Result<String> {
        Ok(URL_SAFE_NO_PAD.encode(format!("{name}:{id}")))
    }

    fn unseal(&self, name: &str, value: &str) -> Result<String> {
        let decoded = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|e| SessionError::Authentication(e.to_string()))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|e| SessionError::Authentication(e.to_string()))?;
        decoded
            .strip_prefix(&format!("{name}:"))
            .map(str::to_string)
            .ok_or_else(|| {
                SessionError::Authentication(format!("cookie value not bound to '{name}'"))
            })
    }
}
