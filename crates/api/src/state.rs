use std::sync::Arc;

use qa_relay_events::{Dispatcher, UserConfigStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Notification pipeline. Owns the user config cache.
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(config: ServerConfig, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }

    pub fn store(&self) -> &Arc<UserConfigStore> {
        self.dispatcher.store()
    }
}
