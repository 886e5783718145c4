//! Durable record storage delegated to an embedded SQLite database.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use tracing::debug;

use crate::backend::{RecordStore, SessionRecord};
use crate::error::{Result, SessionError};

/// [`RecordStore`] implementation over a SQLite database.
///
/// Timestamps are stored as RFC 3339 text in UTC, which keeps expiration
/// comparisons valid as plain string comparisons.
pub struct SqliteRecordStore {
    /// The SQLite connection (wrapped in Mutex for thread safety).
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open a transient in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                kind        TEXT NOT NULL,
                id          TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                expires_at  TEXT,
                payload     BLOB NOT NULL,
                PRIMARY KEY (kind, id)
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_expires
                ON sessions (kind, expires_at);
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| SessionError::InvalidData(e.to_string()))
    }
}

impl std::fmt::Debug for SqliteRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRecordStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn put(&self, kind: &str, id: &str, record: SessionRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO sessions (kind, id, created_at, expires_at, payload)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (kind, id) DO UPDATE SET
                created_at = excluded.created_at,
                expires_at = excluded.expires_at,
                payload = excluded.payload
            "#,
            params![
                kind,
                id,
                record.created_at.to_rfc3339(),
                record.expires_at.map(|e| e.to_rfc3339()),
                record.payload,
            ],
        )?;
        debug!(kind, session_id = id, "session record written");
        Ok(())
    }

    async fn get(&self, kind: &str, id: &str) -> Result<Option<SessionRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT created_at, expires_at, payload FROM sessions WHERE kind = ?1 AND id = ?2",
        )?;
        let mut rows = stmt.query(params![kind, id])?;

        if let Some(row) = rows.next()? {
            let created_at: String = row.get(0)?;
            let expires_at: Option<String> = row.get(1)?;
            let payload: Vec<u8> = row.get(2)?;
            Ok(Some(SessionRecord {
                created_at: Self::parse_timestamp(&created_at)?,
                expires_at: expires_at
                    .map(|raw| Self::parse_timestamp(&raw))
                    .transpose()?,
                payload,
            }))
        } else {
            Ok(None)
        }
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM sessions WHERE kind = ?1 AND id = ?2",
            params![kind, id],
        )?;
        Ok(())
    }

    async fn expired_ids(&self, kind: &str, cutoff: DateTime<Utc>) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id FROM sessions
            WHERE kind = ?1 AND expires_at IS NOT NULL AND expires_at <= ?2
            "#,
        )?;
        let mut rows = stmt.query(params![kind, cutoff.to_rfc3339()])?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(expires_at: Option<DateTime<Utc>>, payload: &[u8]) -> SessionRecord {
        SessionRecord {
            created_at: Utc::now(),
            expires_at,
            payload: payload.to_vec(),
        }
    }

    #[tokio::test]
    async fn put_get_delete() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        let expires = Utc::now() + Duration::hours(1);

        store
            .put("Session", "s1", record(Some(expires), b"payload"))
            .await
            .unwrap();

        let fetched = store.get("Session", "s1").await.unwrap().unwrap();
        assert_eq!(fetched.payload, b"payload");
        assert_eq!(
            fetched.expires_at.unwrap().timestamp_micros(),
            expires.timestamp_micros()
        );

        store.delete("Session", "s1").await.unwrap();
        assert!(store.get("Session", "s1").await.unwrap().is_none());

        // Deleting an absent record is not an error.
        store.delete("Session", "s1").await.unwrap();
    }

    #[tokio::test]
    async fn put_overwrites_wholesale() {
        let store = SqliteRecordStore::open_in_memory().unwrap();

        store
            .put("Session", "s1", record(None, b"first"))
            .await
            .unwrap();
        store
            .put("Session", "s1", record(None, b"second"))
            .await
            .unwrap();

        let fetched = store.get("Session", "s1").await.unwrap().unwrap();
        assert_eq!(fetched.payload, b"second");
    }

    #[tokio::test]
    async fn expired_ids_respects_cutoff_and_kind() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        let now = Utc::now();

        store
            .put("Session", "dead", record(Some(now - Duration::minutes(5)), b"x"))
            .await
            .unwrap();
        store
            .put("Session", "live", record(Some(now + Duration::minutes(5)), b"x"))
            .await
            .unwrap();
        store
            .put("Session", "eternal", record(None, b"x"))
            .await
            .unwrap();
        store
            .put("Other", "dead", record(Some(now - Duration::minutes(5)), b"x"))
            .await
            .unwrap();

        let ids = store.expired_ids("Session", now).await.unwrap();
        assert_eq!(ids, vec!["dead".to_string()]);
    }
}
