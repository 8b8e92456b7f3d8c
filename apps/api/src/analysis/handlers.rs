//! Axum route handlers for the analysis endpoint.

use axum::{extract::Multipart, extract::State, Json};
use tracing::{info, warn};

use crate::analysis::pipeline::analyze;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::state::AppState;
use crate::upload::DocumentForm;

/// One extra attempt on top of the initial call, applied only when the
/// failure cause is retryable (timeouts, connection drops, upstream 5xx).
/// Schema failures never retry.
const MAX_ANALYZE_ATTEMPTS: u32 = 2;

/// POST /analyze
///
/// Multipart form: `resume_file` or `resume_text`, `job_description_file` or
/// `job_description_text`, optional `rewrite_all_bullets`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let form = DocumentForm::from_multipart(multipart).await?;

    let resume_text = form.resolve_resume(state.config.max_text_size)?;
    let job_description = form.resolve_job_description(state.config.max_text_size)?;

    let mut last_error: Option<AppError> = None;

    for attempt in 1..=MAX_ANALYZE_ATTEMPTS {
        info!("Analyzing resume (attempt {attempt}/{MAX_ANALYZE_ATTEMPTS})");
        match analyze(
            state.llm.as_ref(),
            &state.config,
            &resume_text,
            &job_description,
            form.rewrite_all_bullets,
        )
        .await
        {
            Ok(result) => return Ok(Json(result)),
            Err(e) => {
                warn!("Analysis attempt {attempt}/{MAX_ANALYZE_ATTEMPTS} failed: {e}");
                let retry = attempt < MAX_ANALYZE_ATTEMPTS && e.is_retryable();
                last_error = Some(e);
                if !retry {
                    break;
                }
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| AppError::Internal(anyhow::anyhow!("analysis produced no result"))))
}
