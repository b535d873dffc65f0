use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Completion client behind a trait object so tests can substitute stubs.
    pub llm: Arc<dyn CompletionClient>,
    pub config: Config,
}
