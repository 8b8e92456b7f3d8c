use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
/// Returns a simple status object with service version.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "careerboost-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health
/// Detailed health check: config flags and active session count.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "api_key_configured": !state.config.openrouter_api_key.is_empty(),
        "max_text_size": state.config.max_text_size,
        "active_sessions": state.sessions.len().await
    }))
}
