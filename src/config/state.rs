// Application state module
// Holds what every connection shares: settings, the dispatcher and counters

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use super::types::Config;
use crate::handler::Dispatcher;

/// Application state
pub struct AppState {
    pub config: Config,
    pub dispatcher: Arc<Dispatcher>,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
            active_connections: AtomicUsize::new(0),
        }
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
