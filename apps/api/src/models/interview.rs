//! Data models for the mock-interview session and turn results.

use serde::{Deserialize, Serialize};

/// Scored feedback for one answered interview question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewFeedback {
    /// Closed range [1, 10].
    pub score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggested_answer: String,
}

/// One question/answer unit within an interview session.
///
/// `answer` is recorded later, when the user responds to this specific turn.
/// Invariant (enforced by the turn engine): at most the last turn in a
/// session may have a missing answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl TurnRecord {
    pub fn unanswered(question: String) -> Self {
        TurnRecord {
            question,
            answer: None,
        }
    }
}

/// Result of one interview turn, returned to the caller as a unit: feedback
/// for the previous answer (when one was scored) is never observable without
/// the next question generated in the same turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// Human-readable message: the feedback summary, or the bare question
    /// when no answer was scored.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<InterviewFeedback>,
    pub next_question: String,
}
