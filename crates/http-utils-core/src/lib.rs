//! # http-utils-core
//!
//! Core types and helpers shared by the HTTP utilities.
//!
//! ## Modules
//!
//! - [`query`] - Turns a record of optional fields into a URL query string
//! - [`casing`] - camelCase to hyphenated lowercase conversion for query keys
//! - [`json`] - JSON marshaling without HTML escaping, and body decoding
//! - [`zero`] - Default-value comparison
//! - [`config`] - Transport configuration
//! - [`error`] - Error types and structured error responses

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod casing;
pub mod config;
pub mod error;
pub mod json;
pub mod query;
pub mod zero;

// Re-export commonly used types
pub use error::{Error, Result};
pub use num_bigint::BigInt;
pub use query::{QueryField, QueryRecord, QueryValue, ToQueryValue};
