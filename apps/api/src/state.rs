use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::cache::EvaluationCache;
use crate::extraction::TextExtractor;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Chat-completion backend. Production: `LlmClient`.
    pub llm: Arc<dyn CompletionBackend>,
    /// PDF text extractor, built once at startup.
    pub extractor: Arc<dyn TextExtractor>,
    /// Last-evaluation cache. Redis or in-memory depending on `REDIS_URL`.
    pub cache: Arc<dyn EvaluationCache>,
    pub config: Config,
}
