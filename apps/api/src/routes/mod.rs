pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::analysis::handlers as analysis_handlers;
use crate::interview::handlers as interview_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/analyze", post(analysis_handlers::handle_analyze))
        .route("/interview/start", post(interview_handlers::handle_start))
        .route("/interview/chat", post(interview_handlers::handle_chat))
        .route(
            "/interview/history/:session_id",
            get(interview_handlers::handle_history),
        )
        .route(
            "/interview/session/:session_id",
            delete(interview_handlers::handle_clear),
        )
        .with_state(state)
}
