use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelClient;
use crate::screening::cache::ResponseCache;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable model backend. Default: GeminiClient.
    pub model: Arc<dyn ModelClient>,
    /// Raw model responses keyed by the exact (job description, resume text) pair.
    pub cache: Arc<ResponseCache>,
}
