use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionOracle;
use crate::session::registry::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    /// Completion backend. `LlmClient` in production, a stub in tests.
    pub oracle: Arc<dyn CompletionOracle>,
    pub config: Config,
}
