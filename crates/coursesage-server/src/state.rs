//! Shared application state.

use std::sync::Arc;

use coursesage_chat::{ChatCompleter, CompletionClient, LLMConfig};
use coursesage_core::CourseSageConfig;
use coursesage_pipeline::AiService;
use coursesage_store::SqliteStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: CourseSageConfig,
    pub store: SqliteStore,
    pub ai: AiService,
    /// Loaded once at startup; only its masked summary is ever served.
    pub llm_config: LLMConfig,
}

impl AppState {
    /// Resolve the completion provider and build the AI service.
    pub fn new(
        config: CourseSageConfig,
        store: SqliteStore,
        llm_config: LLMConfig,
    ) -> coursesage_core::Result<Self> {
        let client = CompletionClient::new(llm_config.resolve_and_report(), &config.ai.completion)?;
        Ok(Self::with_completer(config, store, llm_config, Arc::new(client)))
    }

    /// Build state around an arbitrary completer.
    pub fn with_completer(
        config: CourseSageConfig,
        store: SqliteStore,
        llm_config: LLMConfig,
        completer: Arc<dyn ChatCompleter>,
    ) -> Self {
        let ai = AiService::new(completer, config.ai.clone());
        Self {
            config,
            store,
            ai,
            llm_config,
        }
    }
}
