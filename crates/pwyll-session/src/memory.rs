//! In-memory backends for tests and single-process deployments.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::backend::{ExpirationJob, JobQueue, RecordStore, SessionCache, SessionRecord};
use crate::error::Result;

/// [`RecordStore`] backed by a process-local map.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<(String, String), SessionRecord>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, across all kinds.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put(&self, kind: &str, id: &str, record: SessionRecord) -> Result<()> {
        self.records
            .write()
            .insert((kind.to_string(), id.to_string()), record);
        Ok(())
    }

    async fn get(&self, kind: &str, id: &str) -> Result<Option<SessionRecord>> {
        Ok(self
            .records
            .read()
            .get(&(kind.to_string(), id.to_string()))
            .cloned())
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<()> {
        self.records
            .write()
            .remove(&(kind.to_string(), id.to_string()));
        Ok(())
    }

    async fn expired_ids(&self, kind: &str, cutoff: DateTime<Utc>) -> Result<Vec<String>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|((k, _), record)| {
                k == kind && record.expires_at.is_some_and(|e| e <= cutoff)
            })
            .map(|((_, id), _)| id.clone())
            .collect())
    }
}

/// [`SessionCache`] backed by a process-local map.
///
/// Entries past their TTL read as misses; they are pruned lazily on the
/// next write to the same key or dropped with the store.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (Vec<u8>, Instant)>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionCache for MemoryCache {
    async fn set(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<()> {
        let deadline = Instant::now() + ttl;
        self.entries
            .write()
            .insert(key.to_string(), (payload, deadline));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).and_then(|(payload, deadline)| {
            if Instant::now() < *deadline {
                Some(payload.clone())
            } else {
                None
            }
        }))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// [`JobQueue`] that records scheduled jobs instead of delivering them.
///
/// The host process (or a test) decides when to deliver: [`due`] returns
/// jobs whose `not_before` has passed, [`drain`] hands over everything.
///
/// [`due`]: MemoryJobQueue::due
/// [`drain`]: MemoryJobQueue::drain
#[derive(Debug, Default)]
pub struct MemoryJobQueue {
    jobs: RwLock<Vec<ExpirationJob>>,
}

impl MemoryJobQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// All scheduled jobs, in enqueue order.
    pub fn jobs(&self) -> Vec<ExpirationJob> {
        self.jobs.read().clone()
    }

    /// Jobs whose delivery time has arrived, leaving them scheduled.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<ExpirationJob> {
        self.jobs
            .read()
            .iter()
            .filter(|job| job.not_before <= now)
            .cloned()
            .collect()
    }

    /// Remove and return every scheduled job.
    pub fn drain(&self) -> Vec<ExpirationJob> {
        std::mem::take(&mut *self.jobs.write())
    }
}

#[async_trait]
impl JobQueue for MemoryJobQueue {
    async fn enqueue(&self, job: ExpirationJob) -> Result<()> {
        self.jobs.write().push(job);
        Ok(())
    }
}
