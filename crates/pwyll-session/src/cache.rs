//! Cache-backed session store.

use std::time::Duration;

use tracing::debug;

use crate::backend::SessionCache;
use crate::codec;
use crate::config::StoreConfig;
use crate::cookie::CookieSealer;
use crate::error::{Result, SessionError};
use crate::session::{Session, SessionCookie, SessionValues, generate_session_id};

/// Session store persisting payloads in a volatile TTL cache.
///
/// Mirrors [`DatastoreStore`](crate::DatastoreStore) except that the cache
/// itself owns expiration: entries are written with a TTL and no deferred
/// job or sweep is needed. Session IDs are namespaced with the configured
/// key prefix so several applications can share one cache.
///
/// Concurrent saves to the same session ID are not coordinated at this
/// layer; the last write wins in the cache.
pub struct CacheStore<C, S> {
    config: StoreConfig,
    cache: C,
    sealer: S,
}

impl<C, S> CacheStore<C, S>
where
    C: SessionCache,
    S: CookieSealer,
{
    /// Create a store over the given cache.
    pub fn new(config: StoreConfig, cache: C, sealer: S) -> Self {
        Self {
            config,
            cache,
            sealer,
        }
    }

    /// The store's configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The cache backend.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Build a session from an inbound cookie value.
    ///
    /// Same dual-return contract as the record-backed store: the session is
    /// always usable, and any unseal or load error rides alongside it. A
    /// cache miss surfaces as [`SessionError::NotFound`], indistinguishable
    /// in effect from the durable backend's, so callers treat both stores
    /// uniformly.
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

    /// Fetch and decode the cached mapping for a (prefixed) session ID.
    async fn load(&self, id: &str) -> Result<SessionValues> {
        let payload = self
            .cache
            .get(id)
            .await?
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        codec::decode(&payload)
    }

    /// Persist the session and return the outbound cookie.
    ///
    /// An empty mapping writes nothing. A positive max-age hands the entry
    /// to the cache with that TTL; a non-positive max-age deletes the entry,
    /// where a miss is benign. The cookie is sealed only after the backend
    /// call has succeeded.
    pub async fn save(&self, session: &mut Session) -> Result<SessionCookie> {
        if session.id.is_empty() {
            session.id = format!("{}{}", self.config.key_prefix, generate_session_id());
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
            let ttl = Duration::from_secs(session.options.max_age as u64);
            self.cache.set(&session.id, payload, ttl).await?;
            debug!(session_id = %session.id, ttl_secs = session.options.max_age, "session entry written");
        } else {
            self.cache.delete(&session.id).await?;
            debug!(session_id = %session.id, "session entry deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::DEFAULT_KEY_PREFIX;
    use crate::cookie::PlainCookieSealer;
    use crate::memory::MemoryCache;

    fn store() -> CacheStore<MemoryCache, PlainCookieSealer> {
        CacheStore::new(
            StoreConfig::default(),
            MemoryCache::new(),
            PlainCookieSealer::new(),
        )
    }

    #[tokio::test]
    async fn save_assigns_prefixed_id() {
        let store = store();
        let (mut session, _) = store.new_session(None, "sid").await;
        session.values.insert("user".to_string(), json!("alice"));

        store.save(&mut session).await.unwrap();
        assert!(session.id.starts_with(DEFAULT_KEY_PREFIX));
        assert!(session.id.len() > DEFAULT_KEY_PREFIX.len());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = store();
        let (mut session, _) = store.new_session(None, "sid").await;
        session.values.insert("user".to_string(), json!("alice"));
        session.values.insert("visits".to_string(), json!(3));

        let cookie = store.save(&mut session).await.unwrap();

        let (loaded, err) = store.new_session(Some(&cookie.value), "sid").await;
        assert!(err.is_none());
        assert!(!loaded.is_new);
        assert_eq!(loaded.values, session.values);
    }

    #[tokio::test]
    async fn cache_miss_is_not_found() {
        let store = store();
        let cookie = PlainCookieSealer::new()
            .seal("sid", "pwyll.sessions.evicted")
            .unwrap();

        let (session, err) = store.new_session(Some(&cookie), "sid").await;
        assert!(session.is_new);
        assert!(matches!(err, Some(SessionError::NotFound(_))));
    }

    #[tokio::test]
    async fn empty_save_writes_nothing() {
        let store = store();
        let (mut session, _) = store.new_session(None, "sid").await;

        let cookie = store.save(&mut session).await.unwrap();
        assert!(!session.id.is_empty());

        // Nothing was cached for the assigned ID.
        assert_eq!(store.cache().get(&session.id).await.unwrap(), None);
        assert!(!cookie.value.is_empty());
    }

    #[tokio::test]
    async fn non_positive_max_age_deletes_entry() {
        let store = store();
        let (mut session, _) = store.new_session(None, "sid").await;
        session.values.insert("user".to_string(), json!("alice"));
        store.save(&mut session).await.unwrap();
        assert!(store.cache().get(&session.id).await.unwrap().is_some());

        session.options.max_age = -1;
        store.save(&mut session).await.unwrap();
        assert!(store.cache().get(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_absent_entry_is_benign() {
        let store = store();
        let (mut session, _) = store.new_session(None, "sid").await;
        session.values.insert("user".to_string(), json!("alice"));
        session.options.max_age = 0;

        // No entry exists for the fresh ID; the delete path must still
        // succeed and hand back a cookie.
        let cookie = store.save(&mut session).await.unwrap();
        assert!(!cookie.value.is_empty());
    }
}
