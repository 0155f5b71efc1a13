//! Token sources
//!
//! The client never runs an OAuth2 grant itself. It asks a [`TokenSource`]
//! for a bearer token before every request; how that token is obtained and
//! refreshed belongs to whoever implements the trait.

use super::types::AccessToken;
use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Supplies the bearer token attached to every outbound request
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a token that is valid right now
    async fn access_token(&self) -> Result<AccessToken>;
}

/// Obtains a fresh token from an external provider
///
/// Implemented for any `Fn() -> impl Future<Output = Result<AccessToken>>`,
/// so a closure around an OAuth2 library call is enough.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Fetch a new token
    async fn refresh(&self) -> Result<AccessToken>;
}

#[async_trait]
impl<F, Fut> TokenRefresher for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<AccessToken>> + Send + 'static,
{
    async fn refresh(&self) -> Result<AccessToken> {
        (self)().await
    }
}

#[async_trait]
impl<S: TokenSource + ?Sized> TokenSource for Arc<S> {
    async fn access_token(&self) -> Result<AccessToken> {
        (**self).access_token().await
    }
}

// ============================================================================
// Static Token
// ============================================================================

/// A fixed token that is never refreshed
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: AccessToken,
}

impl StaticToken {
    /// Create a source that always returns `token`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::permanent(token),
        }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<AccessToken> {
        Ok(self.token.clone())
    }
}

// ============================================================================
// Caching Token Source
// ============================================================================

/// Caches a token and asks the refresher for a new one once it expires
pub struct CachingTokenSource<R> {
    refresher: R,
    cached_token: Arc<RwLock<Option<AccessToken>>>,
}

impl<R: TokenRefresher> CachingTokenSource<R> {
    /// Create a source with an empty cache; the first request triggers a refresh
    pub fn new(refresher: R) -> Self {
        Self {
            refresher,
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a source seeded with a token obtained elsewhere
    pub fn with_token(refresher: R, token: AccessToken) -> Self {
        Self {
            refresher,
            cached_token: Arc::new(RwLock::new(Some(token))),
        }
    }

    /// Drop the cached token so the next request refreshes
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }
}

#[async_trait]
impl<R: TokenRefresher> TokenSource for CachingTokenSource<R> {
    async fn access_token(&self) -> Result<AccessToken> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.clone());
            }
        }

        debug!("Refreshing access token");
        let token = self.refresher.refresh().await?;
        *cached = Some(token.clone());

        Ok(token)
    }
}

impl<R> std::fmt::Debug for CachingTokenSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingTokenSource").finish_non_exhaustive()
    }
}
