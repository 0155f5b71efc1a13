//! Token types
//!
//! An `AccessToken` is what a token provider hands back: the bearer
//! credential plus an optional expiry used by the caching source.

use chrono::{DateTime, Utc};
use std::fmt;

/// Seconds before the real expiry at which a token is treated as expired
const EXPIRY_BUFFER_SECONDS: i64 = 30;

/// Bearer credential with optional expiration
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The access token
    token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a new access token
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Create a token that never expires
    pub fn permanent(token: impl Into<String>) -> Self {
        Self::new(token, None)
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: impl Into<String>, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token: token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// The raw bearer value
    pub fn secret(&self) -> &str {
        &self.token
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(EXPIRY_BUFFER_SECONDS);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = never expires
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
