//! Authentication module
//!
//! Supports: static bearer tokens and cached tokens refreshed through an
//! external provider.
//!
//! OAuth2 grant flows are not implemented here. Callers plug their OAuth2
//! library in through [`TokenRefresher`] (or implement [`TokenSource`]
//! directly) and the transport attaches the resulting bearer token to every
//! request.

mod source;
mod types;

pub use source::{CachingTokenSource, StaticToken, TokenRefresher, TokenSource};
pub use types::AccessToken;
