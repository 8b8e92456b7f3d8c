//! Axum route handlers for the interview endpoints.

use axum::{
    extract::{Multipart, Path, State},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::interview::engine::take_turn;
use crate::models::interview::{TurnOutcome, TurnRecord};
use crate::state::AppState;
use crate::upload::DocumentForm;

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub message: String,
    pub question: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub user_answer: String,
    #[serde(default)]
    pub custom_instructions: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub chat_history: Vec<TurnRecord>,
}

/// POST /interview/start
///
/// Multipart form: resume + job description (file or text), optional
/// `custom_instructions`, required `session_id`. Creates or resets the
/// session and returns the first question.
pub async fn handle_start(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<StartResponse>, AppError> {
    let form = DocumentForm::from_multipart(multipart).await?;

    let session_id = form
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("session_id is required".to_string()))?
        .to_string();

    let resume_text = form.resolve_resume(state.config.max_text_size)?;
    let job_description = form.resolve_job_description(state.config.max_text_size)?;

    let session = state
        .sessions
        .create(
            &session_id,
            resume_text,
            job_description,
            form.custom_instructions.clone(),
        )
        .await;

    let mut session = session.lock().await;
    let outcome = take_turn(state.llm.as_ref(), &state.config, &mut session, None).await?;
    session.touch();

    info!("Interview session '{session_id}' started");

    Ok(Json(StartResponse {
        message: outcome.message,
        question: outcome.next_question,
        session_id,
    }))
}

/// POST /interview/chat
///
/// Form body: `session_id`, `user_answer`, optional `custom_instructions`.
/// Scores the user's answer to the current question and returns feedback
/// together with the next question. Fails with 404 when the session id is
/// unknown; a failed turn leaves the session unchanged.
pub async fn handle_chat(
    State(state): State<AppState>,
    Form(request): Form<ChatRequest>,
) -> Result<Json<TurnOutcome>, AppError> {
    let session = state
        .sessions
        .get(&request.session_id)
        .await
        .ok_or_else(|| AppError::SessionNotFound(request.session_id.clone()))?;

    let mut session = session.lock().await;

    if !request.custom_instructions.trim().is_empty() {
        session.custom_instructions = request.custom_instructions.clone();
    }

    let outcome = take_turn(
        state.llm.as_ref(),
        &state.config,
        &mut session,
        Some(&request.user_answer),
    )
    .await?;
    session.touch();

    Ok(Json(outcome))
}

/// GET /interview/history/:session_id
pub async fn handle_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let session = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;

    let chat_history = session.lock().await.turns.clone();

    Ok(Json(HistoryResponse {
        session_id,
        chat_history,
    }))
}

/// DELETE /interview/session/:session_id
///
/// Idempotent: clearing an absent session still succeeds.
pub async fn handle_clear(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<serde_json::Value> {
    state.sessions.delete(&session_id).await;
    Json(serde_json::json!({ "message": "Session cleared successfully" }))
}

// ────────────────────────────────────────────────────────────────────────────
