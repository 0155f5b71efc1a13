//! Pagination types
//!
//! Guards for the page-following loop and the cancellation signal.

use crate::types::NextLinkPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

// ============================================================================
// Limits
// ============================================================================

/// Guards applied while following next links
///
/// The default follows the server for as many pages as it reports, stops
/// on a link to a page already fetched, and only follows links on the
/// configured host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLimits {
    /// Maximum number of pages to fetch (`None` = unbounded)
    #[serde(default)]
    pub max_pages: Option<usize>,
    /// Fail when a next link repeats an already fetched URL
    #[serde(default = "default_true")]
    pub detect_cycles: bool,
    /// Which next links may be followed
    #[serde(default)]
    pub next_link_policy: NextLinkPolicy,
}

fn default_true() -> bool {
    true
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            max_pages: None,
            detect_cycles: true,
            next_link_policy: NextLinkPolicy::default(),
        }
    }
}

impl PaginationLimits {
    /// No page cap, no cycle detection, any host
    pub fn unbounded() -> Self {
        Self {
            max_pages: None,
            detect_cycles: false,
            next_link_policy: NextLinkPolicy::Any,
        }
    }

    /// Cap the number of pages fetched
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Enable or disable cycle detection
    #[must_use]
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Set which next links may be followed
    #[must_use]
    pub fn with_next_link_policy(mut self, policy: NextLinkPolicy) -> Self {
        self.next_link_policy = policy;
        self
    }
}

// ============================================================================
// Walk State
// ============================================================================

/// Progress through one paginated collection
#[derive(Debug, Clone, Default)]
pub struct PageWalk {
    /// Path or URL of the next page to fetch, `None` when finished
    pub next: Option<String>,
    /// Pages fetched so far
    pub pages: usize,
    /// Elements delivered so far
    pub total_items: u64,
    /// Resolved URLs already fetched
    visited: HashSet<String>,
}

impl PageWalk {
    /// Start a walk at `start`
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            next: Some(start.into()),
            ..Default::default()
        }
    }

    /// Check if the last page has been fetched
    pub fn is_done(&self) -> bool {
        self.next.is_none()
    }

    /// Record a fetch of `url`; returns false if it was fetched before
    pub(crate) fn visit(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Signal that aborts pagination from another task
///
/// Clones share state: cancelling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    inner: Arc<CancelState>,
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelSignal {
    /// Create a signal that is not yet cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel; wakes every task waiting in [`CancelSignal::cancelled`]
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Check if cancel has been called
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the signal is cancelled
    pub async fn cancelled(&self) {
        // Register before checking the flag so a concurrent cancel is not missed
        let notified = self.inner.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}
