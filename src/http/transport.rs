//! Authenticated HTTP transport
//!
//! Resolves paths against the versioned API host, attaches the bearer
//! token and sends the request. Responses are read to the end here, so the
//! connection is back in the pool before any decoding starts.
//!
//! HTTP error statuses are not errors at this layer: the caller inspects
//! [`Response::is_error`] and decodes the API error body itself.

use super::rate_limit::RateLimiter;
use crate::auth::TokenSource;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::Method;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// A request to send through the transport
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Absolute URL or path relative to the versioned host
    pub path: String,
    /// JSON body bytes
    pub body: Option<Bytes>,
}

impl Request {
    /// Create a request without a body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Set raw body bytes
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `body` as the JSON request body
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        let bytes = serde_json::to_vec(body)?;
        Ok(self.body(bytes))
    }

    /// Check whether a non-empty body will be sent
    pub fn has_body(&self) -> bool {
        self.body.as_ref().is_some_and(|b| !b.is_empty())
    }
}

/// A fully read response
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Resolved URL the request was sent to
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Check if the server reported a failure (status >= 400)
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Check if the response carries no content
    pub fn is_empty(&self) -> bool {
        self.status == 204 || self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Authenticated transport bound to a versioned API host
#[derive(Clone)]
pub struct Transport {
    client: Client,
    host: String,
    version: String,
    timeout: Duration,
    default_headers: HashMap<String, String>,
    token_source: Arc<dyn TokenSource>,
    rate_limiter: Option<RateLimiter>,
    log_bodies: bool,
}

impl Transport {
    /// Create a transport from client configuration and a token source
    pub fn new(config: &ClientConfig, token_source: Arc<dyn TokenSource>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            version: config.version.clone(),
            timeout: config.timeout(),
            default_headers: config.default_headers.clone(),
            token_source,
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
            log_bodies: config.log_bodies,
        })
    }

    /// Configured API host, without a trailing slash
    pub fn host(&self) -> &str {
        &self.host
    }

    /// API version used for relative paths
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Change the API version used for future requests
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Resolve a path to an absolute URL
    ///
    /// Absolute URLs are returned unchanged, anything else becomes
    /// `{host}/v{version}/{path}`. Leading slashes on `path` are dropped, so
    /// `"/users"` and `"users"` resolve to the same URL.
    pub fn resolve(&self, path: &str) -> String {
        if is_absolute_url(path) {
            return path.to_string();
        }
        format!(
            "{}/v{}/{}",
            self.host,
            self.version,
            path.trim_start_matches('/')
        )
    }

    /// Send a request and read the whole response body
    pub async fn send(&self, request: Request) -> Result<Response> {
        let url = self.resolve(&request.path);
        let parsed = Url::parse(&url)?;

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let token = self.token_source.access_token().await?;

        let mut req = self
            .client
            .request(request.method.into(), parsed)
            .bearer_auth(token.secret());

        for (key, value) in &self.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if request.has_body() {
            if let Some(body) = request.body {
                req = req.header(CONTENT_TYPE, "application/json").body(body);
            }
        }

        debug!(method = %request.method, url = %url, "Sending request");

        let response = req.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        debug!(status, url = %url, bytes = body.len(), "Received response");
        if self.log_bodies {
            trace!(url = %final_url, body = %String::from_utf8_lossy(&body), "Response body");
        }

        Ok(Response {
            status,
            url,
            final_url,
            body,
        })
    }

    /// Map reqwest failures onto the transport error kinds
    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            #[allow(clippy::cast_possible_truncation)]
            return Error::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            };
        }
        Error::Transport(err)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("host", &self.host)
            .field("version", &self.version)
            .field("timeout", &self.timeout)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .field("log_bodies", &self.log_bodies)
            .finish_non_exhaustive()
    }
}

/// Check if a path is already an absolute URL
pub fn is_absolute_url(path: &str) -> bool {
    Url::parse(path).is_ok()
}

/// Check if two URLs share scheme, host and port
pub fn same_origin(a: &str, b: &str) -> Result<bool> {
    let a = Url::parse(a)?;
    let b = Url::parse(b)?;
    Ok(a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default())
}
