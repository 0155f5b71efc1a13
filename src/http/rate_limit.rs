//! Client-side request throttling
//!
//! Off unless `rate_limit` is set in [`crate::ClientConfig`]. When set, every
//! request sent through a transport (and its clones) waits for a governor
//! permit first.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Requests per second and burst allowance; zero is treated as one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

impl RateLimiterConfig {
    /// Throttle to `requests_per_second` after an initial burst of `burst_size`
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

/// Permit gate shared by clones of a transport
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<DirectLimiter>,
}

impl RateLimiter {
    pub fn new(config: &RateLimiterConfig) -> Self {
        let at_least_one = |n: u32| NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(at_least_one(config.requests_per_second))
            .allow_burst(at_least_one(config.burst_size));

        Self {
            inner: Arc::new(Governor::direct(quota)),
        }
    }

    /// Resolve once a request may be sent
    pub async fn wait(&self) {
        self.inner.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}
