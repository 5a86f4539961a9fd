// Application state module
// Read-only configuration plus lock-free caches shared across connections

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;

/// Application state
///
/// Handlers are pure and the configuration is read once at startup, so the
/// state is immutable after construction. The access-log flag is cached in
/// an atomic so the per-request hot path never takes a lock.
pub struct AppState {
    pub config: Config,
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let cached_access_log = Arc::new(AtomicBool::new(config.logging.access_log));

        Self {
            config: config.clone(),
            cached_access_log,
        }
    }
}
