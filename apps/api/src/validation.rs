//! Schema Validator — the contract between free-form model output and the
//! strongly-typed results the rest of the system trusts.
//!
//! Input is the sanitized JSON text produced by `sanitize::extract_json_payload`.
//! Parsing is lenient where the model is predictably sloppy (scalar coercion,
//! dropped empty list elements, a named repair for the missing answer
//! approach) and strict where the data would otherwise be unusable (ranges,
//! minimum lengths, list bounds). Unknown fields are ignored.

use serde_json::Value;
use thiserror::Error;

use crate::models::analysis::{AnalysisResult, InterviewQuestion, DEFAULT_ANSWER_APPROACH};
use crate::models::interview::InterviewFeedback;

/// Max chars of offending input echoed back in error diagnostics.
const PREVIEW_CHARS: usize = 120;

const MIN_QUESTIONS: usize = 5;
const MAX_QUESTIONS: usize = 10;
const MIN_QUESTION_CHARS: usize = 10;
const MIN_APPROACH_CHARS: usize = 20;
const MIN_COVER_LETTER_CHARS: usize = 50;

/// A structural violation in a model payload. Carries the offending field
/// and a bounded preview of the received value for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("malformed JSON: {reason} (text was: {preview})")]
    MalformedJson { reason: String, preview: String },

    #[error("field '{field}' out of range (got: {preview})")]
    FieldOutOfRange { field: &'static str, preview: String },

    #[error("field '{field}' too short, minimum {min} chars (got: {preview})")]
    FieldTooShort {
        field: &'static str,
        min: usize,
        preview: String,
    },

    #[error("field '{field}' has too few items: minimum {min}, got {got}")]
    TooFewItems {
        field: &'static str,
        min: usize,
        got: usize,
    },

    #[error("field '{field}' has too many items: maximum {max}, got {got}")]
    TooManyItems {
        field: &'static str,
        max: usize,
        got: usize,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Validates sanitized JSON text against the analysis result contract.
pub fn validate_analysis(json_text: &str) -> Result<AnalysisResult, ValidationError> {
    let value = parse(json_text)?;

    let skill_match_percentage = percentage(&value, "skill_match_percentage")?;

    // Repairs, not rejections: elements that trim to empty are dropped.
    let matched_skills = coerce_string_list(value.get("matched_skills"));
    let missing_skills = coerce_string_list(value.get("missing_skills"));
    let optimized_resume_bullets = coerce_string_list(value.get("optimized_resume_bullets"));

    let interview_prep = validate_questions(value.get("interview_prep"))?;

    let cover_letter = required_string(&value, "cover_letter", "cover_letter", MIN_COVER_LETTER_CHARS)?;

    Ok(AnalysisResult {
        skill_match_percentage,
        matched_skills,
        missing_skills,
        optimized_resume_bullets,
        cover_letter,
        interview_prep,
    })
}

/// Validates sanitized JSON text against the interview feedback contract.
pub fn validate_feedback(json_text: &str) -> Result<InterviewFeedback, ValidationError> {
    let value = parse(json_text)?;

    let score = integer_in_range(&value, "score", 1, 10)?;
    let strengths = coerce_string_list(value.get("strengths"));
    let improvements = coerce_string_list(value.get("improvements"));
    let suggested_answer = required_string(&value, "suggested_answer", "suggested_answer", 1)?;

    Ok(InterviewFeedback {
        score: score as u8,
        strengths,
        improvements,
        suggested_answer,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Field-level checks
// ────────────────────────────────────────────────────────────────────────────

fn parse(json_text: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(json_text).map_err(|e| ValidationError::MalformedJson {
        reason: e.to_string(),
        preview: preview(json_text),
    })
}

/// A number in [0, 100], rounded to one decimal. The range check runs on the
/// rounded value, so a raw 100.04 is accepted as 100.0 while 100.05 is not.
fn percentage(value: &Value, field: &'static str) -> Result<f64, ValidationError> {
    let raw = value.get(field);
    let number = raw.and_then(Value::as_f64).ok_or(ValidationError::FieldOutOfRange {
        field,
        preview: optional_preview(raw),
    })?;

    let rounded = (number * 10.0).round() / 10.0;
    if !(0.0..=100.0).contains(&rounded) {
        return Err(ValidationError::FieldOutOfRange {
            field,
            preview: optional_preview(raw),
        });
    }
    Ok(rounded)
}

/// An integral number in [min, max]. Tolerates integral floats (7.0) since
/// some models emit scores that way.
fn integer_in_range(
    value: &Value,
    field: &'static str,
    min: i64,
    max: i64,
) -> Result<i64, ValidationError> {
    let raw = value.get(field);
    let out_of_range = || ValidationError::FieldOutOfRange {
        field,
        preview: optional_preview(raw),
    };

    let number = match raw {
        Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 => f as i64,
            _ => return Err(out_of_range()),
        },
        _ => return Err(out_of_range()),
    };

    if number < min || number > max {
        return Err(out_of_range());
    }
    Ok(number)
}

/// Coerces a list field to trimmed strings, dropping elements that are empty
/// after trimming or are not scalar. Missing / non-array fields become an
/// empty list.
fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(coerce_scalar)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A required string field (scalar-coerced, trimmed) with a minimum length.
fn required_string(
    parent: &Value,
    key: &str,
    field: &'static str,
    min: usize,
) -> Result<String, ValidationError> {
    let raw = parent.get(key);
    let text = raw
        .and_then(coerce_scalar)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    if text.chars().count() < min {
        return Err(ValidationError::FieldTooShort {
            field,
            min,
            preview: optional_preview(raw),
        });
    }
    Ok(text)
}

/// Validates the interview question list: length in [5, 10], per-question
/// minimums, and the named repair for a missing answer approach.
fn validate_questions(value: Option<&Value>) -> Result<Vec<InterviewQuestion>, ValidationError> {
    const FIELD: &str = "interview_prep";

    let items: &[Value] = match value.and_then(Value::as_array) {
        Some(items) => items.as_slice(),
        None => &[],
    };

    if items.len() < MIN_QUESTIONS {
        return Err(ValidationError::TooFewItems {
            field: FIELD,
            min: MIN_QUESTIONS,
            got: items.len(),
        });
    }
    if items.len() > MAX_QUESTIONS {
        return Err(ValidationError::TooManyItems {
            field: FIELD,
            max: MAX_QUESTIONS,
            got: items.len(),
        });
    }

    items.iter().map(validate_question).collect()
}

fn validate_question(item: &Value) -> Result<InterviewQuestion, ValidationError> {
    if !item.is_object() {
        return Err(ValidationError::FieldOutOfRange {
            field: "interview_prep",
            preview: preview(&item.to_string()),
        });
    }

    let question = required_string(item, "question", "interview_prep.question", MIN_QUESTION_CHARS)?;
    let category = required_string(item, "category", "interview_prep.category", 1)?;

    // The model frequently omits this field under token-budget pressure;
    // synthesize the fallback instead of failing. Re-validating the repaired
    // object is a no-op (the fallback satisfies the minimum length).
    let suggested_answer_approach = match item.get("suggested_answer_approach") {
        None | Some(Value::Null) => DEFAULT_ANSWER_APPROACH.to_string(),
        Some(_) => required_string(
            item,
            "suggested_answer_approach",
            "interview_prep.suggested_answer_approach",
            MIN_APPROACH_CHARS,
        )?,
    };

    Ok(InterviewQuestion {
        question,
        category,
        suggested_answer_approach,
    })
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{truncated}…")
}

fn optional_preview(value: Option<&Value>) -> String {
    match value {
        Some(v) => preview(&v.to_string()),
        None => "<missing>".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
