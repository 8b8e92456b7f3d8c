//! Response Sanitizer — isolates a JSON payload from surrounding narrative.
//!
//! Models frequently wrap JSON in markdown code fences or pad it with prose
//! despite being told not to. This is a pure text transform: it never parses
//! and never fails. Schema enforcement lives in `validation`.

/// Best-effort extraction of a JSON object from a raw model completion.
///
/// Steps, in order:
/// 1. Strip a leading ``` fence (optionally tagged `json`) and a trailing
///    fence, tolerating the absence of either.
/// 2. If the remaining text contains both `{` and `}`, slice from the first
///    `{` to the last `}` inclusive, discarding surrounding prose.
/// 3. Trim whitespace.
///
/// Returns the trimmed input unchanged if no brace pair is found.
pub fn extract_json_payload(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped;
    } else if let Some(stripped) = text.strip_prefix("```") {
        text = stripped;
    }
    if let Some(stripped) = text.trim_end().strip_suffix("```") {
        text = stripped;
    }
    let text = text.trim();

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return text[start..=end].to_string();
        }
    }

    text.to_string()
}
