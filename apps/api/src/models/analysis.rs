//! Data models for the one-shot resume-vs-JD analysis result.
//!
//! These are the *validated* shapes. Raw model output never deserializes
//! directly into them — it goes through `sanitize` + `validation` first,
//! which repair or reject non-conforming payloads.

use serde::{Deserialize, Serialize};

/// Fallback answer approach inserted when the model omits
/// `suggested_answer_approach` — a frequent omission under token pressure.
/// An explicit repair, not a rejection.
pub const DEFAULT_ANSWER_APPROACH: &str = "Use specific examples from your experience. \
    Be clear, concise, and demonstrate your skills with measurable results.";

/// A single interview-prep question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    /// Question text, at least 10 chars.
    pub question: String,
    /// Open label set (e.g. "Technical", "Behavioral", "Experience-Based") —
    /// deliberately not an enum; the model invents new categories freely.
    pub category: String,
    /// At least 20 chars; repaired with `DEFAULT_ANSWER_APPROACH` if absent.
    pub suggested_answer_approach: String,
}

/// Validated result of one resume-vs-job analysis. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Closed range [0, 100], rounded to one decimal.
    pub skill_match_percentage: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub optimized_resume_bullets: Vec<String>,
    /// At least 50 chars after trimming.
    pub cover_letter: String,
    /// Between 5 and 10 questions.
    pub interview_prep: Vec<InterviewQuestion>,
}
