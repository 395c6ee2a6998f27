//! JSON-oriented HTTP request helpers.
//!
//! Builds requests with default JSON headers, issues them through a pluggable
//! [`Transport`], and hands back the raw status and body.

#![deny(missing_docs)]

pub mod client;
pub mod request;
pub mod response;

pub use client::{http_request, request_json, HttpTransport, HttpTransportBuilder, Transport};
pub use request::{default_headers, Header, PreparedRequest};
pub use response::RawResponse;

/// Convenient result alias that reuses the shared error type.
pub type Result<T> = http_utils_core::Result<T>;
