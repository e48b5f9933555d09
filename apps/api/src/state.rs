use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::resume::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text generator behind every model-backed route. Default: `LlmClient` (Gemini).
    pub generator: Arc<dyn TextGenerator>,
    pub resumes: Arc<ResumeStore>,
    pub config: Config,
}
