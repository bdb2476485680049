use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "skill-sketch",
        "evaluation_api": state.config.evaluation_api_base_url,
        "active_sessions": state.sessions.len(),
        "session_ttl_secs": state.sessions.ttl().as_secs()
    }))
}
