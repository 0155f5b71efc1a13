//! CLI module
//!
//! Command-line interface over [`crate::Client`].
//!
//! # Commands
//!
//! - `get` - Fetch a single entity
//! - `list` - Fetch every element of a paginated collection

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
