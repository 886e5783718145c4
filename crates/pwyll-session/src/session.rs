//! The in-memory session object and identifier generation.

use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

use crate::config::CookieOptions;

/// The key/value mapping a request handler reads and writes.
///
/// Values are tagged JSON values, so arbitrary mixes of scalars, arrays and
/// nested objects round-trip through the stores without a schema.
pub type SessionValues = HashMap<String, serde_json::Value>;

/// A per-user session bound to a browser via an identifier cookie.
#[derive(Debug, Clone)]
pub struct Session {
    /// Backend key for the stored payload. Empty until the first save.
    pub id: String,

    /// Cookie name the session travels under.
    pub name: String,

    /// The mutable payload.
    pub values: SessionValues,

    /// True until the session has been loaded from a backend.
    pub is_new: bool,

    /// Cookie attributes used when writing the session back.
    pub options: CookieOptions,
}

impl Session {
    /// Create a fresh, empty session for the given cookie name.
    pub fn new(name: impl Into<String>, options: CookieOptions) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            values: SessionValues::new(),
            is_new: true,
            options,
        }
    }
}

/// An outbound cookie carrying the sealed session ID.
///
/// Returned by the stores once the backend write has succeeded; the
/// surrounding framework attaches it to the HTTP response.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    /// Cookie name.
    pub name: String,

    /// Sealed cookie value.
    pub value: String,

    /// Cookie attributes. A non-positive max-age tells the framework to
    /// expire the cookie client-side.
    pub options: CookieOptions,
}

/// Generate a new session identifier from 32 bytes of randomness.
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
