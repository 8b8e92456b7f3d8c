//! Interview Turn Engine — the state machine driving one interview turn.
//!
//! Observable states per session: AwaitingAnswer (last turn has a question,
//! no answer) and AwaitingQuestion (no turns, or all turns answered).
//!
//! Scoring a turn issues two independent LLM calls — answer feedback
//! (strict JSON) and next-question generation (free text). Both must succeed
//! before anything is committed to the session: a failed turn leaves the
//! turn history exactly as it was.

use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::extract::truncate_chars;
use crate::interview::prompts::{
    FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM, NO_HISTORY, NO_INSTRUCTIONS,
    QUESTION_PROMPT_TEMPLATE, QUESTION_SYSTEM,
};
use crate::interview::session::SessionState;
use crate::llm_client::CompletionClient;
use crate::models::interview::{InterviewFeedback, TurnOutcome, TurnRecord};
use crate::sanitize::extract_json_payload;
use crate::validation::validate_feedback;

const QUESTION_TEMPERATURE: f32 = 0.8;
const QUESTION_MAX_TOKENS: u32 = 300;
const FEEDBACK_TEMPERATURE: f32 = 0.7;
const FEEDBACK_MAX_TOKENS: u32 = 1_000;

/// Executes one interview turn against a locked session.
///
/// With an answer and an unanswered question on record, the previous answer
/// is scored and a new question generated; otherwise the turn only produces
/// the next question. Feedback and next question are returned together —
/// the caller can never observe one without the other.
pub async fn take_turn(
    llm: &dyn CompletionClient,
    config: &Config,
    session: &mut SessionState,
    user_answer: Option<&str>,
) -> Result<TurnOutcome, AppError> {
    let answer = user_answer.map(str::trim).filter(|a| !a.is_empty());

    if let Some(answer) = answer {
        if session.awaiting_answer() {
            // Last turn is guaranteed present by awaiting_answer().
            let question = session
                .turns
                .last()
                .map(|t| t.question.clone())
                .unwrap_or_default();

            let feedback = evaluate_answer(llm, config, session, &question, answer).await?;
            let next_question =
                generate_question(llm, config, session, Some((&question, answer))).await?;

            // Both calls succeeded — commit the answer and the new turn.
            if let Some(last) = session.turns.last_mut() {
                last.answer = Some(answer.to_string());
            }
            session
                .turns
                .push(TurnRecord::unanswered(next_question.clone()));

            let message = format_feedback_message(&feedback);
            return Ok(TurnOutcome {
                message,
                feedback: Some(feedback),
                next_question,
            });
        }
    }

    // No prior unanswered question to score — question-only turn.
    let question = generate_question(llm, config, session, None).await?;
    session.turns.push(TurnRecord::unanswered(question.clone()));

    Ok(TurnOutcome {
        message: question.clone(),
        feedback: None,
        next_question: question,
    })
}

/// Scores one answer via the feedback sub-pipeline: LLM call → sanitize →
/// validate.
async fn evaluate_answer(
    llm: &dyn CompletionClient,
    config: &Config,
    session: &SessionState,
    question: &str,
    answer: &str,
) -> Result<InterviewFeedback, AppError> {
    let prompt = FEEDBACK_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
        .replace(
            "{job_context}",
            truncate_chars(&session.job_description, config.feedback_context_chars),
        )
        .replace(
            "{background}",
            truncate_chars(&session.resume_text, config.feedback_context_chars),
        );

    let raw = llm
        .complete(
            FEEDBACK_SYSTEM,
            &prompt,
            FEEDBACK_TEMPERATURE,
            FEEDBACK_MAX_TOKENS,
        )
        .await?;

    let payload = extract_json_payload(&raw);
    let feedback = validate_feedback(&payload)?;
    info!("Answer scored {}/10", feedback.score);
    Ok(feedback)
}

/// Generates the next question from full turn history and custom
/// instructions. `pending` carries the question/answer pair being scored in
/// the same turn, which is not yet committed to the session.
async fn generate_question(
    llm: &dyn CompletionClient,
    config: &Config,
    session: &SessionState,
    pending: Option<(&str, &str)>,
) -> Result<String, AppError> {
    let history = history_context(&session.turns, pending);
    let instructions = session.custom_instructions.trim();

    let prompt = QUESTION_PROMPT_TEMPLATE
        .replace(
            "{job_description}",
            truncate_chars(&session.job_description, config.question_context_chars),
        )
        .replace(
            "{resume}",
            truncate_chars(&session.resume_text, config.question_context_chars),
        )
        .replace(
            "{history}",
            if history.is_empty() {
                NO_HISTORY
            } else {
                history.as_str()
            },
        )
        .replace(
            "{instructions}",
            if instructions.is_empty() {
                NO_INSTRUCTIONS
            } else {
                instructions
            },
        );

    let question = llm
        .complete(
            QUESTION_SYSTEM,
            &prompt,
            QUESTION_TEMPERATURE,
            QUESTION_MAX_TOKENS,
        )
        .await?;

    Ok(question.trim().to_string())
}

/// Serializes answered turns (plus the not-yet-committed pending pair) into
/// Q/A lines for the question prompt.
fn history_context(turns: &[TurnRecord], pending: Option<(&str, &str)>) -> String {
    let mut lines: Vec<String> = turns
        .iter()
        .filter_map(|t| {
            t.answer
                .as_deref()
                .map(|answer| format!("Q: {}\nA: {}", t.question, answer))
        })
        .collect();

    if let Some((question, answer)) = pending {
        lines.push(format!("Q: {question}\nA: {answer}"));
    }

    lines.join("\n")
}

/// Composes the human-readable feedback message embedding score, strengths,
/// improvements and the suggested answer.
fn format_feedback_message(feedback: &InterviewFeedback) -> String {
    let strengths = feedback
        .strengths
        .iter()
        .map(|s| format!("• {s}"))
        .collect::<Vec<_>>()
        .join("\n");
    let improvements = feedback
        .improvements
        .iter()
        .map(|i| format!("• {i}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Great! Let me provide feedback on your answer.\n\n\
         **Score: {}/10**\n\n\
         **Strengths:**\n{}\n\n\
         **Areas to Improve:**\n{}\n\n\
         **Suggested Answer:**\n{}\n\n\
         Ready for the next question?",
        feedback.score, strengths, improvements, feedback.suggested_answer
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedClient;
    use crate::llm_client::LlmError;
    use std::time::Instant;

    fn session() -> SessionState {
        SessionState {
            resume_text: "Five years building backend services in Rust.".to_string(),
            job_description: "Senior backend engineer, Rust and PostgreSQL.".to_string(),
            custom_instructions: String::new(),
            turns: Vec::new(),
            last_active: Instant::now(),
        }
    }

    fn feedback_json() -> String {
        r#"{
            "score": 7,
            "strengths": ["Concrete example", "Clear structure"],
            "improvements": ["Quantify the impact"],
            "suggested_answer": "Lead with the measurable outcome of the migration."
        }"#
        .to_string()
    }

    #[tokio::test]
    async fn test_fresh_session_generates_question_only() {
        let llm = ScriptedClient::new(vec![Ok("Tell me about your Rust experience.".to_string())]);
        let config = Config::for_tests();
        let mut session = session();

        let outcome = take_turn(&llm, &config, &mut session, None).await.unwrap();

        assert!(outcome.feedback.is_none());
        assert_eq!(outcome.message, outcome.next_question);
        assert_eq!(session.turns.len(), 1);
        assert!(session.awaiting_answer());
        assert_eq!(llm.calls_made(), 1);
    }

    #[tokio::test]
    async fn test_answer_on_empty_history_falls_through_to_question_only() {
        // An answer with no recorded question must not attempt scoring.
        let llm = ScriptedClient::new(vec![Ok("What drew you to this role?".to_string())]);
        let config = Config::for_tests();
        let mut session = session();

        let outcome = take_turn(&llm, &config, &mut session, Some("my answer"))
            .await
            .unwrap();

        assert!(outcome.feedback.is_none());
        assert_eq!(llm.calls_made(), 1);
        assert_eq!(session.turns.len(), 1);
        assert!(session.turns[0].answer.is_none());
    }

    #[tokio::test]
    async fn test_answered_turn_scores_then_appends_next_question() {
        let llm = ScriptedClient::new(vec![
            Ok(feedback_json()),
            Ok("How do you approach schema migrations?".to_string()),
        ]);
        let config = Config::for_tests();
        let mut session = session();
        session
            .turns
            .push(TurnRecord::unanswered("Tell me about Rust.".to_string()));

        let outcome = take_turn(&llm, &config, &mut session, Some("My answer"))
            .await
            .unwrap();

        let feedback = outcome.feedback.expect("feedback should be present");
        assert_eq!(feedback.score, 7);
        assert!(outcome.message.contains("**Score: 7/10**"));
        assert!(outcome.message.contains("• Concrete example"));
        assert_eq!(outcome.next_question, "How do you approach schema migrations?");

        // Turn history: answered turn + new unanswered turn.
        assert_eq!(session.turns.len(), 2);
        assert_eq!(session.turns[0].answer.as_deref(), Some("My answer"));
        assert!(session.turns[1].answer.is_none());
        assert_eq!(llm.calls_made(), 2);
    }

    #[tokio::test]
    async fn test_malformed_feedback_fails_turn_without_committing() {
        let llm = ScriptedClient::new(vec![
            Ok("The answer was decent, maybe a 6?".to_string()), // not JSON
            Ok("unused next question".to_string()),
        ]);
        let config = Config::for_tests();
        let mut session = session();
        session
            .turns
            .push(TurnRecord::unanswered("Tell me about Rust.".to_string()));

        let err = take_turn(&llm, &config, &mut session, Some("My answer"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Schema(_)));
        // History unchanged: still one unanswered turn.
        assert_eq!(session.turns.len(), 1);
        assert!(session.turns[0].answer.is_none());
        // Feedback failed first; the question call was never made.
        assert_eq!(llm.calls_made(), 1);
    }

    #[tokio::test]
    async fn test_question_call_failure_also_leaves_history_unmodified() {
        let llm = ScriptedClient::new(vec![Ok(feedback_json()), Err(LlmError::Timeout)]);
        let config = Config::for_tests();
        let mut session = session();
        session
            .turns
            .push(TurnRecord::unanswered("Tell me about Rust.".to_string()));

        let err = take_turn(&llm, &config, &mut session, Some("My answer"))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(session.turns.len(), 1);
        assert!(session.turns[0].answer.is_none());
    }

    #[tokio::test]
    async fn test_blank_answer_treated_as_question_request() {
        let llm = ScriptedClient::new(vec![Ok("Next question.".to_string())]);
        let config = Config::for_tests();
        let mut session = session();
        session
            .turns
            .push(TurnRecord::unanswered("Tell me about Rust.".to_string()));

        let outcome = take_turn(&llm, &config, &mut session, Some("   "))
            .await
            .unwrap();

        assert!(outcome.feedback.is_none());
        assert_eq!(llm.calls_made(), 1);
        // The earlier question is still unanswered; only the new turn was added.
        assert_eq!(session.turns.len(), 2);
        assert!(session.turns[0].answer.is_none());
    }

    #[tokio::test]
    async fn test_full_session_flow_through_store() {
        use crate::interview::session::{InMemorySessionStore, SessionStore};
        use std::time::Duration;

        let store = InMemorySessionStore::new(Duration::from_secs(3600));
        let config = Config::for_tests();

        // Start: first question only.
        let llm = ScriptedClient::new(vec![Ok("Q1".repeat(5))]);
        let shared = store
            .create("s1", "resume".into(), "jd".into(), "".into())
            .await;
        {
            let mut session = shared.lock().await;
            let outcome = take_turn(&llm, &config, &mut session, None).await.unwrap();
            assert!(outcome.feedback.is_none());
        }

        // Answer: feedback plus second question.
        let llm = ScriptedClient::new(vec![Ok(feedback_json()), Ok("Q2 text here".to_string())]);
        {
            let mut session = shared.lock().await;
            let outcome = take_turn(&llm, &config, &mut session, Some("My answer"))
                .await
                .unwrap();
            let feedback = outcome.feedback.expect("answer should be scored");
            assert!((1..=10).contains(&feedback.score));
        }

        let session = store.get("s1").await.unwrap();
        let state = session.lock().await;
        assert_eq!(state.turns.len(), 2);
        assert_eq!(state.turns[0].answer.as_deref(), Some("My answer"));
        assert_eq!(state.turns[1].question, "Q2 text here");
        assert!(state.turns[1].answer.is_none());
    }

    #[test]
    fn test_history_context_includes_only_answered_turns() {
        let turns = vec![
            TurnRecord {
                question: "Q1".to_string(),
                answer: Some("A1".to_string()),
            },
            TurnRecord::unanswered("Q2".to_string()),
        ];
        let history = history_context(&turns, None);
        assert_eq!(history, "Q: Q1\nA: A1");
    }

    #[test]
    fn test_history_context_appends_pending_pair() {
        let turns = vec![TurnRecord {
            question: "Q1".to_string(),
            answer: Some("A1".to_string()),
        }];
        let history = history_context(&turns, Some(("Q2", "A2")));
        assert_eq!(history, "Q: Q1\nA: A1\nQ: Q2\nA: A2");
    }

    #[test]
    fn test_feedback_message_embeds_all_sections() {
        let feedback = InterviewFeedback {
            score: 9,
            strengths: vec!["Strong opening".to_string()],
            improvements: vec!["Shorter close".to_string()],
            suggested_answer: "Open with the result.".to_string(),
        };
        let message = format_feedback_message(&feedback);
        assert!(message.contains("**Score: 9/10**"));
        assert!(message.contains("• Strong opening"));
        assert!(message.contains("• Shorter close"));
        assert!(message.contains("Open with the result."));
    }
}
