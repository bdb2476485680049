use std::sync::Arc;

use crate::config::Config;
use crate::evaluation_client::EvaluationService;
use crate::wizard::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable evaluation backend. Default: `EvaluationClient` over HTTP.
    pub evaluator: Arc<dyn EvaluationService>,
    pub sessions: SessionStore,
}
