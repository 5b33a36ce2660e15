//! Server state.

use crate::config::EdgeConfig;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Media-provider API key (`None` when not configured server-side)
    pub api_key: Option<String>,
    /// Display name reported to clients
    pub app_name: String,
}

impl From<&EdgeConfig> for AppState {
    fn from(config: &EdgeConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            app_name: config.app_name.clone(),
        }
    }
}
