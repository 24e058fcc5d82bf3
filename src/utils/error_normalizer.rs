use serde_json::Value;

use crate::error::StylistError;

pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

/// Extracts the most specific human readable message from an error text.
///
/// Provider failures often arrive as JSON, sometimes with a second JSON
/// document encoded inside the `error` string. The attempts run in order and
/// each one falls back to the less specific text when parsing fails:
///
/// 1. `{"message": "..."}` gives the outer message.
/// 2. `{"error": "<json with message>"}` gives the inner message.
/// 3. `{"error": {"message": "..."}}` gives the inner message.
/// 4. `{"error": "..."}` gives the outer error string.
/// 5. Anything else is returned as is.
///
/// Only these two levels are inspected.
pub fn normalize_error_message(raw: &str) -> String {
    if raw.is_empty() {
        return UNKNOWN_ERROR.to_string();
    }

    let Ok(Value::Object(outer)) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };

    if let Some(message) = outer.get("message").and_then(non_empty_str) {
        return message.to_string();
    }

    match outer.get("error") {
        Some(Value::String(inner)) => nested_message(inner).unwrap_or_else(|| inner.clone()),
        Some(Value::Object(inner)) => inner
            .get("message")
            .and_then(non_empty_str)
            .map(str::to_string)
            .unwrap_or_else(|| raw.to_string()),
        _ => raw.to_string(),
    }
}

/// User facing text for any failure on the generation path.
pub fn describe(error: &StylistError) -> String {
    normalize_error_message(&error.to_string())
}

fn nested_message(encoded: &str) -> Option<String> {
    match serde_json::from_str::<Value>(encoded).ok()? {
        Value::Object(inner) => inner.get("message").and_then(non_empty_str).map(str::to_string),
        _ => None,
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}
