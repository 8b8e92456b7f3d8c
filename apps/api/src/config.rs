use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// The prompt excerpt caps trade completion latency against context
/// completeness — they are tunable, not a contract.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on resume / job description size after extraction.
    pub max_text_size: usize,
    /// Chars of resume text included in the analysis prompt.
    pub analysis_resume_chars: usize,
    /// Chars of job description included in the analysis prompt.
    pub analysis_jd_chars: usize,
    /// Chars of resume/JD context included in the question-generation prompt.
    pub question_context_chars: usize,
    /// Chars of resume/JD context included in the answer-feedback prompt.
    pub feedback_context_chars: usize,
    /// Idle time after which an interview session is evicted.
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            port: optional_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_text_size: optional_env("MAX_TEXT_SIZE", 50_000)?,
            analysis_resume_chars: optional_env("ANALYSIS_RESUME_CHARS", 4_000)?,
            analysis_jd_chars: optional_env("ANALYSIS_JD_CHARS", 2_500)?,
            question_context_chars: optional_env("QUESTION_CONTEXT_CHARS", 2_000)?,
            feedback_context_chars: optional_env("FEEDBACK_CONTEXT_CHARS", 1_000)?,
            session_ttl: Duration::from_secs(optional_env("SESSION_TTL_SECS", 3_600)?),
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Config {
            openrouter_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            max_text_size: 50_000,
            analysis_resume_chars: 4_000,
            analysis_jd_chars: 2_500,
            question_context_chars: 2_000,
            feedback_context_chars: 1_000,
            session_ttl: Duration::from_secs(3_600),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}
