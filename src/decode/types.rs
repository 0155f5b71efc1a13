//! Decoder types
//!
//! Defines the page envelope and the field names used to read it.

use serde::{Deserialize, Serialize};

/// Default name of the collection field in a paginated response
pub const DEFAULT_VALUE_FIELD: &str = "value";

/// Default name of the next-page link field in a paginated response
pub const DEFAULT_NEXT_LINK_FIELD: &str = "@odata.nextLink";

/// Field names of the paginated response envelope
///
/// ```json
/// { "value": [ ... ], "@odata.nextLink": "https://..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeFormat {
    /// Field holding the array of elements
    #[serde(default = "default_value_field")]
    pub value_field: String,
    /// Field holding the absolute URL of the next page
    #[serde(default = "default_next_link_field")]
    pub next_link_field: String,
}

impl Default for EnvelopeFormat {
    fn default() -> Self {
        Self {
            value_field: default_value_field(),
            next_link_field: default_next_link_field(),
        }
    }
}

impl EnvelopeFormat {
    /// Create an envelope format with custom field names
    pub fn new(value_field: impl Into<String>, next_link_field: impl Into<String>) -> Self {
        Self {
            value_field: value_field.into(),
            next_link_field: next_link_field.into(),
        }
    }
}

fn default_value_field() -> String {
    DEFAULT_VALUE_FIELD.to_string()
}

fn default_next_link_field() -> String {
    DEFAULT_NEXT_LINK_FIELD.to_string()
}

/// One decoded page of a paginated collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Elements in the order the server returned them
    pub items: Vec<T>,
    /// Absolute URL of the next page, `None` on the final page
    pub next_link: Option<String>,
}

impl<T> Page<T> {
    /// Check if this is the final page
    pub fn is_last(&self) -> bool {
        self.next_link.is_none()
    }

    /// Number of elements on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page holds no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
