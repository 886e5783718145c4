//! Record-backed session store with deferred expiration.

use chrono::{Duration, Utc};
use tracing::debug;

use crate::backend::{ExpirationJob, JobQueue, RecordStore, SessionRecord};
use crate::codec;
use crate::config::StoreConfig;
use crate::cookie::CookieSealer;
use crate::error::{Result, SessionError};
use crate::session::{Session, SessionCookie, SessionValues, generate_session_id};

/// Session store persisting payloads in a durable record store.
///
/// Saving with a positive max-age also schedules a one-shot deferred
/// deletion job timed to the expiration instant. The job handler
/// ([`crate::expire_session`]) re-checks the stored expiration before
/// deleting, so a session refreshed after the job was scheduled survives.
///
/// Concurrent saves to the same session ID are not coordinated at this
/// layer; the last write wins in the backend.
pub struct DatastoreStore<R, Q, S> {
    config: StoreConfig,
    records: R,
    queue: Q,
    sealer: S,
}

impl<R, Q, S> DatastoreStore<R, Q, S>
where
    R: RecordStore,
    Q: JobQueue,
    S: CookieSealer,
{
    /// Create a store over the given backends.
    pub fn new(config: StoreConfig, records: R, queue: Q, sealer: S) -> Self {
        Self {
            config,
            records,
            queue,
            sealer,
        }
    }

    /// The store's configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The durable backend, e.g. for wiring the bulk sweep.
    pub fn records(&self) -> &R {
        &self.records
    }

    /// The deferred job queue.
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// Build a session from an inbound cookie value.
    ///
    /// Always yields a usable session. With no cookie the session is fresh
    /// and the error slot is empty. When unsealing or loading fails the
    /// session is still fresh and usable and the error is returned
    /// alongside it; callers decide whether that is degraded-but-functional
    /// or fatal. Check both.
    pub async fn new_session(
        &self,
        cookie: Option<&str>,
        name: &str,
    ) -> (Session, Option<SessionError>) {
        let mut session = Session::new(name, self.config.cookie.clone());
        let Some(value) = cookie else {
            return (session, None);
        };

        let id = match self.sealer.unseal(name, value) {
            Ok(id) => id,
            Err(err) => return (session, Some(err)),
        };
        session.id = id;

        match self.load(&session.id).await {
            Ok(values) => {
                session.values = values;
                session.is_new = false;
                (session, None)
            }
            Err(err) => (session, Some(err)),
        }
    }

    /// Fetch and decode the stored mapping for a session ID.
    async fn load(&self, id: &str) -> Result<SessionValues> {
        let record = self
            .records
            .get(&self.config.kind, id)
            .await?
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        codec::decode(&record.payload)
    }

    /// Persist the session and return the outbound cookie.
    ///
    /// An empty mapping writes nothing and leaves any stored record
    /// untouched. A non-positive max-age deletes the stored record instead
    /// of writing it. The cookie is sealed only after the backend write has
    /// succeeded.
    pub async fn save(&self, session: &mut Session) -> Result<SessionCookie> {
        if session.id.is_empty() {
            session.id = generate_session_id();
        }
        self.persist(session).await?;

        let value = self.sealer.seal(&session.name, &session.id)?;
        Ok(SessionCookie {
            name: session.name.clone(),
            value,
            options: session.options.clone(),
        })
    }

    async fn persist(&self, session: &Session) -> Result<()> {
        if session.values.is_empty() {
            // Nothing to write.
            return Ok(());
        }
        let payload = codec::encode(&session.values)?;

        if session.options.max_age > 0 {
            let now = Utc::now();
            let expires_at = now + Duration::seconds(session.options.max_age);
            self.records
                .put(
                    &self.config.kind,
                    &session.id,
                    SessionRecord {
                        created_at: now,
                        expires_at: Some(expires_at),
                        payload,
                    },
                )
                .await?;
            debug!(session_id = %session.id, %expires_at, "session record written");

            self.queue
                .enqueue(ExpirationJob {
                    kind: self.config.kind.clone(),
                    session_id: session.id.clone(),
                    not_before: expires_at,
                })
                .await?;
        } else {
            self.records.delete(&self.config.kind, &session.id).await?;
            debug!(session_id = %session.id, "session record deleted");
        }
        Ok(())
    }
}
