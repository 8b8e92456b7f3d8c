use std::sync::Arc;

use crate::config::Config;
use crate::interview::session::SessionStore;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The LLM collaborator seam — scripted in tests, OpenRouter in production.
    pub llm: Arc<dyn CompletionClient>,
    /// Pluggable session store. Default: in-memory with TTL eviction.
    pub sessions: Arc<dyn SessionStore>,
    pub config: Config,
}
