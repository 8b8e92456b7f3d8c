use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::validation::ValidationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Schema error: {0}")]
    Schema(#[from] ValidationError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the boundary layer may retry the operation that produced this
    /// error. Only transient collaborator failures qualify — retrying a
    /// non-deterministic model on a schema failure does not fix the
    /// structural problem.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Llm(e) if e.is_retryable())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session '{id}' not found. Please start a new interview."),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(ext) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_FORMAT",
                format!("Unsupported file type '{ext}'. Allowed types: .pdf, .docx, .doc"),
            ),
            AppError::ExtractionFailed(msg) => (
                StatusCode::BAD_REQUEST,
                "EXTRACTION_FAILED",
                format!("Failed to extract text from document: {msg}"),
            ),
            AppError::Schema(e) => {
                tracing::error!("Schema validation error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SCHEMA_ERROR",
                    format!("The AI response did not match the expected structure: {e}"),
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    format!("An AI processing error occurred: {e}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_timeout_is_retryable() {
        assert!(AppError::Llm(LlmError::Timeout).is_retryable());
    }

    #[test]
    fn test_schema_error_is_not_retryable() {
        let err = AppError::Schema(ValidationError::MalformedJson {
            reason: "expected value".to_string(),
            preview: "not json".to_string(),
        });
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_session_not_found_is_not_retryable() {
        assert!(!AppError::SessionNotFound("s1".to_string()).is_retryable());
    }
}
