//! Helpers for pulling JSON out of completion text
//!
//! Models often wrap JSON answers in a Markdown code fence, and long array
//! answers get cut off when the model runs out of tokens.

use log::debug;
use serde_json::Value;

use crate::error::Result;

const FENCE: &str = "```";

/// Return the body of a fenced block (```` ``` ```` or ```` ```json ````) when
/// the whole text is one; otherwise the trimmed text.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    if text.len() < FENCE.len() * 2 || !text.starts_with(FENCE) || !text.ends_with(FENCE) {
        return text;
    }

    let inner = &text[FENCE.len()..text.len() - FENCE.len()];
    inner.strip_prefix("json").unwrap_or(inner).trim()
}

/// Parse a completion as JSON, salvaging a truncated top-level array if needed.
///
/// When nothing can be salvaged the original parse error is returned.
pub fn parse_json_response(raw: &str) -> Result<Value> {
    let text = strip_code_fence(raw);
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) => match salvage_array(text) {
            Some(value) => {
                debug!("Salvaged truncated JSON array from completion");
                Ok(value)
            }
            None => Err(err.into()),
        },
    }
}

fn salvage_array(text: &str) -> Option<Value> {
    if !text.starts_with('[') {
        return None;
    }

    let mut attempts = vec![format!("{text}]"), format!("{text}\"}}]")];
    let trimmed = text.trim_end();
    if let Some(without_comma) = trimmed.strip_suffix(',') {
        attempts.push(format!("{}{}]", without_comma, &text[trimmed.len()..]));
    }

    // Fall back to the last complete element before a `},`
    if let Some(idx) = text.rfind("},")
        && idx + 2 > 10
    {
        attempts.push(format!("{}]", &text[..=idx]));
    }

    attempts
        .iter()
        .filter_map(|candidate| serde_json::from_str::<Value>(candidate).ok())
        .find(|value| value.as_array().is_some_and(|items| !items.is_empty()))
}
