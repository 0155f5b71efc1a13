//! Response body decoders
//!
//! Generic over the target type: the caller picks `T` and serde does the
//! rest, so there is no per-resource decoding code.

use super::types::{EnvelopeFormat, Page};
use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a single entity from a response body
pub fn decode_single<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::decode(url, format!("invalid JSON: {e}")))
}

/// Decode one page of a paginated collection
///
/// A missing or `null` collection field is an empty page. An empty, `null`
/// or missing next link marks the final page.
pub fn decode_page<T: DeserializeOwned>(
    url: &str,
    body: &[u8],
    format: &EnvelopeFormat,
) -> Result<Page<T>> {
    let mut envelope: JsonObject = serde_json::from_slice(body)
        .map_err(|e| Error::decode(url, format!("invalid JSON envelope: {e}")))?;

    let items = match envelope.remove(&format.value_field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value(value).map_err(|e| {
                    Error::decode(
                        url,
                        format!("element {index} of '{}': {e}", format.value_field),
                    )
                })
            })
            .collect::<Result<Vec<T>>>()?,
        Some(other) => {
            return Err(Error::decode(
                url,
                format!(
                    "field '{}' must be an array, found {}",
                    format.value_field,
                    json_type_name(&other)
                ),
            ))
        }
    };

    let next_link = match envelope.remove(&format.next_link_field) {
        None | Some(Value::Null) => None,
        Some(Value::String(link)) if link.trim().is_empty() => None,
        Some(Value::String(link)) => Some(link),
        Some(other) => {
            return Err(Error::decode(
                url,
                format!(
                    "field '{}' must be a string, found {}",
                    format.next_link_field,
                    json_type_name(&other)
                ),
            ))
        }
    };

    Ok(Page { items, next_link })
}

/// Name of a JSON value's type, for error messages
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
