use std::sync::Arc;

use cinelog_core::{Config, MovieStore, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    store: Arc<dyn MovieStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn MovieStore>) -> Self {
        Self { config, store }
    }

    pub fn store(&self) -> &dyn MovieStore {
        self.store.as_ref()
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }
}
