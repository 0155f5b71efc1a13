//! Error types for graph-client
//!
//! This module defines the error hierarchy for the entire client.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use std::fmt;
use thiserror::Error;

/// A failure reported by the API itself (HTTP status >= 400)
///
/// Built by [`crate::decode::decode_api_error`], which never fails: when the
/// body is not a recognised error envelope the raw text becomes the message
/// and the code is left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Resolved URL of the request that failed
    pub source_url: String,
    /// HTTP status code
    pub status: u16,
    /// API error code (e.g. "Forbidden"), empty when unknown
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() {
            write!(f, "HTTP {} from {}: {}", self.status, self.source_url, self.message)
        } else {
            write!(
                f,
                "HTTP {} from {}: {}: {}",
                self.status, self.source_url, self.code, self.message
            )
        }
    }
}

impl std::error::Error for ApiError {}

/// The main error type for graph-client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Token refresh failed: {message}")]
    TokenRefresh { message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // API Errors
    // ============================================================================
    #[error("API error: {0}")]
    Api(ApiError),

    // ============================================================================
    // Decode Errors
    // ============================================================================
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Pagination stopped after {max_pages} pages without reaching the last page")]
    PageLimitExceeded { max_pages: usize },

    #[error("Next link points back to an already fetched page: {url}")]
    CursorCycle { url: String },

    #[error("Refusing to follow next link to a foreign host: {url}")]
    UntrustedNextLink { url: String },

    #[error("Request cancelled")]
    Cancelled,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a token refresh error
    pub fn token_refresh(message: impl Into<String>) -> Self {
        Self::TokenRefresh {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a generic error, typically returned from a fallible element callback
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Check if this error was reported by the API (HTTP status >= 400)
    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api(_))
    }

    /// Check if this error came from the network layer rather than the API
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Timeout { .. } | Error::InvalidUrl(_)
        )
    }

    /// The decoded API error, if this is one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for graph-client
pub type Result<T> = std::result::Result<T, Error>;
