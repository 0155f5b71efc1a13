//! Response decoder module
//!
//! Decodes JSON bodies into caller-chosen types: a single entity, a page of
//! a paginated collection, or a structured API error.
//!
//! # Overview
//!
//! Paginated responses are envelopes holding an element array and an
//! optional link to the next page. The field names default to the Graph
//! convention (`value`, `@odata.nextLink`) and can be changed through
//! [`EnvelopeFormat`].

mod decoders;
mod error;
mod types;

pub use decoders::{decode_page, decode_single};
pub use error::decode_api_error;
pub use types::{EnvelopeFormat, Page, DEFAULT_NEXT_LINK_FIELD, DEFAULT_VALUE_FIELD};
