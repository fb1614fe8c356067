use std::sync::Arc;
use popcorn_core::{Config, PopcornController, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    controller: Arc<PopcornController>,
}

impl AppState {
    pub fn new(config: Config, controller: Arc<PopcornController>) -> Self {
        Self { config, controller }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn controller(&self) -> &PopcornController {
        self.controller.as_ref()
    }
}
