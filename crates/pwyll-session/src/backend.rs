//! Traits for the externally-provided storage and queue services.
//!
//! The stores treat every backend call as an individually-atomic,
//! possibly-blocking operation and propagate its latency and failure.
//! Dropping the returned future cancels the call; no retries happen at
//! this layer.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// A session payload persisted in the durable backend, keyed by
/// `(kind, session id)`.
///
/// A record whose `expires_at` is in the past is logically dead: it must
/// not be treated as a live session and is garbage awaiting collection by
/// the deferred job or the bulk sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// When the record was written.
    pub created_at: DateTime<Utc>,

    /// When the session stops being valid. `None` means no expiration was
    /// recorded.
    pub expires_at: Option<DateTime<Utc>>,

    /// Opaque encoded session mapping.
    pub payload: Vec<u8>,
}

/// Durable keyed record storage (the "datastore" collaborator).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Upsert the record stored under `(kind, id)`.
    async fn put(&self, kind: &str, id: &str, record: SessionRecord) -> Result<()>;

    /// Fetch the record under `(kind, id)`, or `None` when absent.
    async fn get(&self, kind: &str, id: &str) -> Result<Option<SessionRecord>>;

    /// Delete the record under `(kind, id)`. Deleting an absent record is
    /// not an error, so concurrent deletions race benignly.
    async fn delete(&self, kind: &str, id: &str) -> Result<()>;

    /// IDs of all records of `kind` whose expiration is at or before
    /// `cutoff`. Records without an expiration are never returned.
    async fn expired_ids(&self, kind: &str, cutoff: DateTime<Utc>) -> Result<Vec<String>>;
}

/// Volatile TTL cache (the "memcache" collaborator).
///
/// The cache owns expiration: an entry disappears at or after its TTL
/// elapses, and nothing here re-checks it.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Store `payload` under `key` until `ttl` elapses.
    async fn set(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Fetch the payload under `key`, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove `key`. A miss is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// A one-shot deferred deletion job bound to a stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirationJob {
    /// Record kind the session lives under.
    pub kind: String,

    /// Session to re-check and delete.
    pub session_id: String,

    /// Earliest instant the job should be delivered.
    pub not_before: DateTime<Utc>,
}

/// Deferred job queue (the task-queue collaborator).
///
/// Delivery is at-least-once at or after `not_before`; duplicate and late
/// deliveries are expected, which is why the handler re-validates the
/// stored expiration before deleting anything.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Schedule `job` for delivery.
    async fn enqueue(&self, job: ExpirationJob) -> Result<()>;
}
