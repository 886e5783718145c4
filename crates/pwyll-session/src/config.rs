//! Configuration for the session stores.

/// Default record kind name for the durable backend.
pub const DEFAULT_KIND: &str = "Session";

/// Default namespace prefix for cache keys.
pub const DEFAULT_KEY_PREFIX: &str = "pwyll.sessions.";

/// Default cookie path.
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// Default session lifetime in seconds (30 days).
pub const DEFAULT_MAX_AGE: i64 = 86400 * 30;

/// Attributes applied to outbound session cookies.
#[derive(Debug, Clone)]
pub struct CookieOptions {
    /// Cookie path attribute.
    pub path: String,

    /// Session lifetime in seconds. Zero or negative terminates the
    /// session on the next save.
    pub max_age: i64,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: DEFAULT_COOKIE_PATH.to_string(),
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

/// Configuration shared by both store adapters.
///
/// Defaults are carried here explicitly rather than in global state; a
/// config is handed to each store constructor.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Record kind name used by the durable backend. An empty kind is
    /// normalized to [`DEFAULT_KIND`].
    pub kind: String,

    /// Namespace prefix for cache keys, so several applications can share
    /// one cache without colliding.
    pub key_prefix: String,

    /// Cookie attributes assigned to new sessions.
    pub cookie: CookieOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: DEFAULT_KIND.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            cookie: CookieOptions::default(),
        }
    }
}

impl StoreConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record kind name. An empty kind falls back to the default.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        self.kind = if kind.is_empty() {
            DEFAULT_KIND.to_string()
        } else {
            kind
        };
        self
    }

    /// Set the cache key prefix. An empty prefix falls back to the default.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.key_prefix = if prefix.is_empty() {
            DEFAULT_KEY_PREFIX.to_string()
        } else {
            prefix
        };
        self
    }

    /// Set the cookie path.
    pub fn with_cookie_path(mut self, path: impl Into<String>) -> Self {
        self.cookie.path = path.into();
        self
    }

    /// Set the session lifetime in seconds.
    pub fn with_max_age(mut self, max_age: i64) -> Self {
        self.cookie.max_age = max_age;
        self
    }
}
