//! API error body decoding
//!
//! Turns the body of a failed response into an [`ApiError`]. This never
//! fails: anything that is not a recognised error envelope is kept as text.

use crate::error::ApiError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decode an error response into an [`ApiError`]
///
/// Recognised shapes, checked in order:
/// - `{"error": {"code": "...", "message": "..."}}`
/// - `{"error": "invalid_grant", "error_description": "..."}`
/// - `{"code": "...", "message": "..."}`
///
/// Otherwise the trimmed body text becomes the message, or the status
/// reason phrase when the body is empty.
pub fn decode_api_error(source_url: &str, status: u16, body: &[u8]) -> ApiError {
    let (code, message) = match serde_json::from_slice::<Value>(body) {
        Ok(value) => structured_error(&value)
            .unwrap_or_else(|| (String::new(), raw_message(status, body))),
        Err(_) => (String::new(), raw_message(status, body)),
    };

    ApiError {
        source_url: source_url.to_string(),
        status,
        code,
        message,
    }
}

fn structured_error(value: &Value) -> Option<(String, String)> {
    let object = value.as_object()?;

    match object.get("error") {
        Some(nested @ Value::Object(_)) => return code_and_message(nested),
        Some(Value::String(code)) => {
            let message = object
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or_default();
            return Some((code.clone(), message.to_string()));
        }
        _ => {}
    }

    if !object.contains_key("code") && !object.contains_key("message") {
        return None;
    }
    code_and_message(value)
}

/// Read a `{code, message}` pair; `None` when the fields have the wrong
/// types or are both empty, so the raw body is kept instead
fn code_and_message(value: &Value) -> Option<(String, String)> {
    let body = ErrorBody::deserialize(value).ok()?;
    let code = body.code.unwrap_or_default();
    let message = body.message.unwrap_or_default();
    if code.is_empty() && message.is_empty() {
        return None;
    }
    Some((code, message))
}

fn raw_message(status: u16, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map_or_else(|| format!("HTTP {status}"), str::to_string)
}
