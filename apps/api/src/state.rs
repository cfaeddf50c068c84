use std::sync::Arc;

use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; no per-request state lives here.
#[derive(Clone)]
pub struct AppState {
    /// Critique backend. Default: Gemini `LlmClient`.
    pub llm: Arc<dyn TextGenerator>,
    /// Text-layer → OCR extraction pipeline. Blocking; call via `spawn_blocking`.
    pub extractor: Arc<TextExtractor>,
    pub config: Config,
}
