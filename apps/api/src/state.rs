use std::sync::Arc;

use crate::advisor::extractor::ExtractionMode;
use crate::llm_client::ChatModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Nothing here is mutable; requests never coordinate with each other.
#[derive(Clone)]
pub struct AppState {
    /// Chat model backend. `LlmClient` in production, scripted in tests.
    pub llm: Arc<dyn ChatModel>,
    /// How kWh figures are read out of the savings-estimate response.
    pub kwh_extraction: ExtractionMode,
}
