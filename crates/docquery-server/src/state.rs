//! Shared application state.

use std::sync::Arc;

use docquery_chat::{GenerativeModel, LLMConfig, QueryPipeline};
use docquery_core::DocQueryConfig;
use docquery_ingest::ExtractorRegistry;
use docquery_store::DocumentStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: DocQueryConfig,
    pub store: DocumentStore,
    pub registry: ExtractorRegistry,
    pub pipeline: QueryPipeline,
    pub llm_config: LLMConfig,
}

impl AppState {
    pub fn new(config: DocQueryConfig, llm_config: LLMConfig, model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            config,
            store: DocumentStore::new(),
            registry: ExtractorRegistry::with_defaults(),
            pipeline: QueryPipeline::new(model),
            llm_config,
        }
    }
}
