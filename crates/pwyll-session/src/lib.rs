//! Server-side session persistence keyed by a signed cookie.
//!
//! Request handlers keep session key/value data in a durable record store
//! or a volatile TTL cache; the cookie carries only a sealed session
//! identifier. Both stores share one codec and one ID scheme and differ
//! only in expiration strategy: the record-backed store schedules a
//! deferred deletion job re-checked at delivery time, the cache-backed
//! store leans on the cache's native TTL.
//!
//! The storage engines, the job queue and the cookie cryptography are
//! external collaborators behind the traits in [`backend`] and
//! [`CookieSealer`]; in-memory implementations and an embedded SQLite
//! record store are provided.
//!
//! # Example
//!
//! ```rust,ignore
//! use pwyll_session::{
//!     DatastoreStore, MemoryJobQueue, MemoryRecordStore, PlainCookieSealer, StoreConfig,
//! };
//!
//! let store = DatastoreStore::new(
//!     StoreConfig::default(),
//!     MemoryRecordStore::new(),
//!     MemoryJobQueue::new(),
//!     PlainCookieSealer::new(),
//! );
//!
//! let (mut session, err) = store.new_session(cookie_header, "sid").await;
//! if let Some(err) = err {
//!     tracing::warn!(%err, "session load failed; continuing with a fresh session");
//! }
//! session.values.insert("user".into(), serde_json::json!("alice"));
//! let cookie = store.save(&mut session).await?;
//! // Attach `cookie` to the HTTP response.
//! ```

pub mod backend;
mod cache;
pub mod codec;
mod config;
mod cookie;
mod datastore;
mod error;
mod expire;
pub mod memory;
mod session;
mod sqlite;

pub use backend::{ExpirationJob, JobQueue, RecordStore, SessionCache, SessionRecord};
pub use cache::CacheStore;
pub use config::{
    CookieOptions, DEFAULT_COOKIE_PATH, DEFAULT_KEY_PREFIX, DEFAULT_KIND, DEFAULT_MAX_AGE,
    StoreConfig,
};
pub use cookie::{CookieSealer, PlainCookieSealer};
pub use datastore::DatastoreStore;
pub use error::{Result, SessionError};
pub use expire::{expire_session, remove_expired_sessions};
pub use memory::{MemoryCache, MemoryJobQueue, MemoryRecordStore};
pub use session::{Session, SessionCookie, SessionValues, generate_session_id};
pub use sqlite::SqliteRecordStore;
