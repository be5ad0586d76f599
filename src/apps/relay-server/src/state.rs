use crate::config::RelayConfig;
use paddock_ai_adapters::CompletionProvider;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    /// `None` when no provider credential is configured.
    pub provider: Option<Arc<dyn CompletionProvider>>,
}

impl AppState {
    pub fn new(config: RelayConfig, provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}
