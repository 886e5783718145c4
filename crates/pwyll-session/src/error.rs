//! Error types for session persistence.

use thiserror::Error;

/// Errors surfaced by the session stores and expiration machinery.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A cookie was present but failed authenticated decoding.
    ///
    /// Treated like a missing cookie (the caller gets a fresh session), but
    /// still surfaced so the caller can log or act on it.
    #[error("cookie authentication failed: {0}")]
    Authentication(String),

    /// No record or cache entry exists for the session ID.
    #[error("session not found: {0}")]
    NotFound(String),

    /// The stored payload could not be encoded or decoded.
    #[error("payload codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A storage or queue backend call failed.
    #[error("backend error: {0}")]
    Backend(String),

    /// Embedded database operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value could not be interpreted (e.g. a mangled timestamp).
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
