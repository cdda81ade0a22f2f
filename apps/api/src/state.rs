use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::panel::PanelConfig;
use crate::llm_client::LlmCapability;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Provider fallback chain in production; scripted in tests.
    pub llm: Arc<dyn LlmCapability>,
    /// Redis when REDIS_URL is set, otherwise in-process.
    pub sessions: Arc<dyn SessionStore>,
    pub config: Config,
    pub panel: PanelConfig,
}
