//! Best-effort extraction of a JSON object from a model completion.
//!
//! Models are told to return bare JSON, but sometimes wrap it in prose or a
//! markdown fence. Extraction tries a strict parse of the whole text first,
//! then a strict parse of the span from the first `{` to the last `}`.
//!
//! Braces are not balanced. A string value containing a stray `}` after the
//! real object can mis-bound the span, in which case extraction fails.

use serde_json::Value;

/// Parse `raw` into a JSON object, or `None` when no object can be recovered.
///
/// The returned value is always a `Value::Object`.
pub fn parse_candidate(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();

    if let Some(value) = parse_object(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if start >= end {
        return None;
    }

    parse_object(&trimmed[start..=end])
}

fn parse_object(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Truncate raw model text for inclusion in diagnostics.
pub fn bounded_raw(raw: &str, max_chars: usize) -> String {
    raw.chars().take(max_chars).collect()
}
