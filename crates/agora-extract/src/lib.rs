//! # Agora Extract
//!
//! Per-source field lookups for the Agora binding layer.
//!
//! An [`ExtractionContext`] wraps one request and answers
//! [`extract`](ExtractionContext::extract) calls for a field name and a
//! declared [`Source`]. Lookups never fail: a missing field is
//! [`RawValue::Absent`], which is distinct from a present empty string.
//!
//! | Source | Lookup |
//! |--------|--------|
//! | [`Source::Path`] | named path capture |
//! | [`Source::Query`] | first occurrence of a query key |
//! | [`Source::Form`] | URL-encoded or multipart form field, with optional default |
//! | [`Source::Header`] | header by name, case-insensitively |
//! | [`Source::Body`] | top-level member of a JSON object body |
//!
//! Decoding the body as a whole can fail. That happens once, in
//! [`ExtractionContext::decode_body`] or the async
//! [`ExtractionContext::prepare_body`], and is reported as an
//! [`ExtractionError`] carrying an HTTP status and error code.
//!
//! ## Example
//!
//! ```rust
//! use agora_extract::{ExtractionContext, RawValue, Source};
//! use http::Method;
//!
//! let mut ctx = ExtractionContext::builder()
//!     .method(Method::POST)
//!     .header("content-type", "application/json")
//!     .body(r#"{"email": "a@b.com", "street_number": 0}"#)
//!     .build();
//!
//! ctx.decode_body().unwrap();
//! assert_eq!(ctx.extract(Source::Body, "email", None), RawValue::present("a@b.com"));
//! assert_eq!(ctx.extract(Source::Body, "street_number", None).as_str(), "0");
//! assert_eq!(ctx.extract(Source::Body, "role", None), RawValue::Absent);
//! ```

#![doc(html_root_url = "https://docs.rs/agora-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod form;
mod header;
mod json;
mod query;
mod source;

pub use context::{DecodedBody, ExtractionContext, ExtractionContextBuilder, DEFAULT_BODY_LIMIT};
pub use error::ExtractionError;
pub use form::FormFields;
pub use header::{header_value, BodyKind};
pub use json::JsonObject;
pub use query::QueryPairs;
pub use source::{RawValue, Source, ValueKind};

// Re-export useful types from dependencies
pub use agora_router::Params;
