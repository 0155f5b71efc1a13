//! Pagination module
//!
//! Follows server-provided next links to materialise a whole collection.
//!
//! # Overview
//!
//! The engine is generic over the element type: the caller picks `T` and
//! every page is decoded into `Vec<T>` through serde. Elements reach the
//! caller through a callback ([`Paginator::for_each`]), a fallible callback
//! ([`Paginator::try_for_each`]) or a stream ([`Paginator::items`]).
//!
//! The loop ends when a page carries no next link. [`PaginationLimits`]
//! adds a page cap, cycle detection and a same-host check on next links;
//! [`CancelSignal`] aborts from another task.

mod engine;
mod types;

pub use engine::Paginator;
pub use types::{CancelSignal, PageWalk, PaginationLimits};
