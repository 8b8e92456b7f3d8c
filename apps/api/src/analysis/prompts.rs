// All LLM prompt constants for the analysis pipeline.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt for the one-shot analysis call — enforces JSON-only output.
pub const ANALYSIS_SYSTEM: &str = "You are an expert resume optimizer. \
    Return ONLY valid JSON, no markdown. \
    Be concise and accurate. Use natural human language, not robotic.";

/// Bullet-rewrite toggle: rewrite everything.
pub const REWRITE_ALL_INSTRUCTION: &str =
    "Rewrite ALL resume bullets in natural, human-like language.";

/// Bullet-rewrite toggle: rewrite only what the job calls for.
pub const REWRITE_RELEVANT_INSTRUCTION: &str =
    "Rewrite ONLY the resume bullets relevant to this job in natural language.";

/// Analysis prompt template. Replace `{resume_excerpt}`, `{jd_excerpt}` and
/// `{bullet_instruction}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze resume vs job description. Return ONLY JSON (no markdown, no code blocks):

RESUME:
{resume_excerpt}

JOB DESCRIPTION:
{jd_excerpt}

{bullet_instruction}

Return this EXACT JSON structure:
{
  "skill_match_percentage": <number 0-100>,
  "matched_skills": ["skill1", "skill2", ...],
  "missing_skills": ["skill3", "skill4", ...],
  "optimized_resume_bullets": ["bullet1 in natural language", "bullet2", ...],
  "cover_letter": "2-3 paragraph professional cover letter",
  "interview_prep": [
    {
      "question": "Interview question text?",
      "category": "Technical",
      "suggested_answer_approach": "Use STAR method: describe situation, task, action, result..."
    },
    {
      "question": "Another question?",
      "category": "Behavioral",
      "suggested_answer_approach": "Focus on specific examples and measurable outcomes..."
    }
  ]
}

Generate 6 interview questions (mix of Technical, Behavioral, Experience-Based).
Each question MUST have: question, category, and suggested_answer_approach.
Make bullets sound human, not robotic."#;
