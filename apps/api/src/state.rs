use std::sync::Arc;

use crate::config::Config;
use crate::extractor::TextExtractor;
use crate::llm_client::InferenceClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds only immutable handles; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable text extractor. Default: PdfTextExtractor.
    pub extractor: Arc<dyn TextExtractor>,
    /// Pluggable inference client. Default: ReplicateClient.
    pub llm: Arc<dyn InferenceClient>,
}
