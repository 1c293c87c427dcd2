//! Shared application state for request handlers.

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::db::StatusStore;
use crate::metrics::RequestCounters;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration, the status log store, the
/// civil-timezone clock, and the process-lifetime request counters. Store and
/// clock are trait objects so tests can substitute doubles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn StatusStore>,
    pub clock: Arc<dyn Clock>,
    pub counters: Arc<RequestCounters>,
}

impl AppState {
    /// Creates a new application state with freshly zeroed request counters.
    pub fn new(config: AppConfig, store: Arc<dyn StatusStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            clock,
            counters: Arc::new(RequestCounters::new()),
        }
    }
}
