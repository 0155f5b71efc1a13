//! Client configuration
//!
//! Host, API version and the knobs of the transport and pagination engine.
//! Every field has a default, so an empty YAML document is a valid config.

use crate::decode::EnvelopeFormat;
use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::pagination::PaginationLimits;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default API host
pub const DEFAULT_HOST: &str = "https://graph.microsoft.com";

/// Default API version
pub const DEFAULT_VERSION: &str = "1.0";

// ============================================================================
// Client Config
// ============================================================================

/// Configuration for a [`crate::Client`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API host, e.g. `https://graph.microsoft.com`
    #[serde(default = "default_host")]
    pub host: String,

    /// API version inserted as `/v{version}/` into relative paths
    #[serde(default = "default_version")]
    pub version: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Headers added to every request
    #[serde(default)]
    pub default_headers: HashMap<String, String>,

    /// Field names of the paginated envelope
    #[serde(default)]
    pub envelope: EnvelopeFormat,

    /// Guards applied while following next links
    #[serde(default)]
    pub limits: PaginationLimits,

    /// Client-side rate limiting (disabled when absent)
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Log response bodies at trace level
    #[serde(default)]
    pub log_bodies: bool,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    format!("graph-client/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            version: default_version(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            default_headers: HashMap::new(),
            envelope: EnvelopeFormat::default(),
            limits: PaginationLimits::default(),
            rate_limit: None,
            log_bodies: false,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load a config file; `.json` files are read as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config: Self = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        let host = Url::parse(&self.host)
            .map_err(|e| Error::config(format!("invalid host '{}': {e}", self.host)))?;
        if !matches!(host.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "host '{}' must use http or https",
                self.host
            )));
        }
        if self.version.trim().is_empty() {
            return Err(Error::config("version must not be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(Error::config("timeout_ms must be greater than zero"));
        }
        if self.limits.max_pages == Some(0) {
            return Err(Error::config("limits.max_pages must be greater than zero"));
        }
        if self.envelope.value_field.is_empty() || self.envelope.next_link_field.is_empty() {
            return Err(Error::config("envelope field names must not be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the API version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Set the request timeout
    #[allow(clippy::cast_possible_truncation)]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the envelope field names
    pub fn envelope(mut self, envelope: EnvelopeFormat) -> Self {
        self.config.envelope = envelope;
        self
    }

    /// Set the pagination guards
    pub fn limits(mut self, limits: PaginationLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Log response bodies at trace level
    pub fn log_bodies(mut self, enabled: bool) -> Self {
        self.config.log_bodies = enabled;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
