// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # graph-client
//!
//! A generic client for paginated, token-authenticated HTTP JSON APIs such
//! as Microsoft Graph.
//!
//! ## Features
//!
//! - **Typed Reads**: decode any response into a caller-chosen `T: Deserialize`
//! - **Pagination**: follow `@odata.nextLink` until the server stops sending one
//! - **Bearer Auth**: static tokens or cached tokens from an external refresher
//! - **Guards**: page cap, cycle detection, same-host next links, cancellation
//! - **Structured Errors**: API failures carry URL, status, code and message
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use graph_client::{Client, Result};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::from_token("eyJ0...")?;
//!
//!     let me: User = client.get("me").await?;
//!
//!     client
//!         .get_all("users", |user: User| println!("{}", user.id))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Client                             │
//! │  get<T>   get_all<T>   collect_all<T>   stream_all<T>   post │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴──────┬────────────────────────┐
//! │  Pagination  │       Decode        │         HTTP           │
//! ├──────────────┼─────────────────────┼────────────────────────┤
//! │ next links   │ envelope → Vec<T>   │ URL resolution         │
//! │ limits       │ single entity       │ bearer token (auth)    │
//! │ cancellation │ API error bodies    │ rate limiting          │
//! └──────────────┴─────────────────────┴────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Bearer token sources
pub mod auth;

/// Authenticated HTTP transport with rate limiting
pub mod http;

/// Response decoders (entities, pages, API errors)
pub mod decode;

/// Next-link pagination engine
pub mod pagination;

/// Typed client facade
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{ApiError, Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{AccessToken, CachingTokenSource, StaticToken, TokenRefresher, TokenSource};
pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use decode::{EnvelopeFormat, Page};
pub use pagination::{CancelSignal, PaginationLimits};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
