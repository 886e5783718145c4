//! Deferred expiration and bulk cleanup of durable session records.

use chrono::Utc;
use tracing::{debug, error, info};

use crate::backend::RecordStore;
use crate::config::DEFAULT_KIND;
use crate::error::Result;

/// Handle a deferred expiration job for one session record.
///
/// Safe under at-least-once delivery: a record that is already gone is a
/// silent success, and a record whose stored expiration is still in the
/// future — because a later save refreshed it after this job was
/// scheduled — is left in place. Returns whether a record was deleted.
///
/// Storage errors are returned to the scheduler for its own retry policy;
/// no retries happen here.
pub async fn expire_session<R>(records: &R, kind: &str, session_id: &str) -> Result<bool>
where
    R: RecordStore + ?Sized,
{
    debug!(kind, session_id, "expiration job received");

    let record = match records.get(kind, session_id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!(kind, session_id, "record already gone");
            return Ok(false);
        }
        Err(err) => {
            error!(kind, session_id, %err, "expiration job failed to read record");
            return Err(err);
        }
    };

    match record.expires_at {
        Some(expires_at) if Utc::now() > expires_at => {
            if let Err(err) = records.delete(kind, session_id).await {
                error!(kind, session_id, %err, "expiration job failed to delete record");
                return Err(err);
            }
            debug!(kind, session_id, "expired session record deleted");
            Ok(true)
        }
        _ => {
            debug!(kind, session_id, "record not yet expired; leaving in place");
            Ok(false)
        }
    }
}

/// Delete every durable session record whose expiration is at or before
/// now.
///
/// Intended for periodic invocation by an external trigger. An empty
/// `kind` substitutes the default kind name. Each run re-queries from
/// scratch, and deletions are idempotent, so overlapping runs race
/// benignly. Returns the number of records removed.
pub async fn remove_expired_sessions<R>(records: &R, kind: &str) -> Result<usize>
where
    R: RecordStore + ?Sized,
{
    let kind = if kind.is_empty() { DEFAULT_KIND } else { kind };
    let cutoff = Utc::now();

    let ids = records.expired_ids(kind, cutoff).await?;
    let mut removed = 0usize;
    for id in &ids {
        records.delete(kind, id).await?;
        removed += 1;
    }

    if removed > 0 {
        info!(kind, removed, "expired session records removed");
    } else {
        debug!(kind, "no expired session records");
    }
    Ok(removed)
}
