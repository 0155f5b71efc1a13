//! HTTP transport module
//!
//! Binds an authenticated reqwest client to a versioned API host.
//!
//! # Features
//!
//! - **URL Resolution**: relative paths become `{host}/v{version}/{path}`
//! - **Authentication**: bearer token from a [`crate::auth::TokenSource`] on every request
//! - **Rate Limiting**: optional token bucket limiter using governor
//! - **Body Logging**: response bodies at `trace` level when enabled

mod rate_limit;
mod transport;

pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{is_absolute_url, same_origin, Request, Response, Transport};

#[cfg(test)]
mod tests;
