//! Analysis Pipeline — the one-shot resume-vs-JD flow.
//!
//! Flow: truncate inputs → build prompt → one LLM call → sanitize → validate.
//!
//! Exactly one LLM call per invocation; no internal retry. The HTTP boundary
//! applies a bounded retry around `analyze` for retryable causes only.

use tracing::info;

use crate::analysis::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM, REWRITE_ALL_INSTRUCTION,
    REWRITE_RELEVANT_INSTRUCTION,
};
use crate::config::Config;
use crate::errors::AppError;
use crate::extract::truncate_chars;
use crate::llm_client::CompletionClient;
use crate::models::analysis::AnalysisResult;
use crate::sanitize::extract_json_payload;
use crate::validation::validate_analysis;

const ANALYSIS_TEMPERATURE: f32 = 0.7;
const ANALYSIS_MAX_TOKENS: u32 = 2_000;

/// Analyzes a resume against a job description, returning a validated result.
pub async fn analyze(
    llm: &dyn CompletionClient,
    config: &Config,
    resume_text: &str,
    job_description: &str,
    rewrite_all_bullets: bool,
) -> Result<AnalysisResult, AppError> {
    let resume_excerpt = truncate_chars(resume_text, config.analysis_resume_chars);
    let jd_excerpt = truncate_chars(job_description, config.analysis_jd_chars);

    let bullet_instruction = if rewrite_all_bullets {
        REWRITE_ALL_INSTRUCTION
    } else {
        REWRITE_RELEVANT_INSTRUCTION
    };

    let prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{resume_excerpt}", resume_excerpt)
        .replace("{jd_excerpt}", jd_excerpt)
        .replace("{bullet_instruction}", bullet_instruction);

    info!(
        "Requesting analysis completion ({} resume chars, {} JD chars)",
        resume_excerpt.chars().count(),
        jd_excerpt.chars().count()
    );

    let raw = llm
        .complete(
            ANALYSIS_SYSTEM,
            &prompt,
            ANALYSIS_TEMPERATURE,
            ANALYSIS_MAX_TOKENS,
        )
        .await?;

    let payload = extract_json_payload(&raw);
    Ok(validate_analysis(&payload)?)
}
