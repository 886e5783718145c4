//! Application state shared across handlers.

use std::sync::Arc;

use pwyll_session::RecordStore;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The durable record backend the sweep runs against.
    pub records: Arc<dyn RecordStore>,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(records: Arc<dyn RecordStore>, config: ServerConfig) -> Self {
        Self {
            records,
            config: Arc::new(config),
        }
    }
}
