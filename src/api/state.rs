use std::sync::Arc;

use crate::config::Config;
use crate::n8n::Gateway;

/// Shared state for the HTTP service: the remote gateway plus the loaded
/// configuration. Cloned per request by axum.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub config: Config,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>, config: Config) -> Self {
        Self { gateway, config }
    }
}
