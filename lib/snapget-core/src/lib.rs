//! Core types for snapget, a single-call blocking HTTP GET client.
//!
//! This crate provides the transport-agnostic building blocks:
//! - [`build_url`] - base URL + percent-encoded query parameters
//! - [`HeaderList`] - ordered `Name: Value` request headers
//! - [`BodyAccumulator`] - append-only buffer fed with body chunks
//! - [`GetRequest`] and [`PreparedRequest`] - request description and its prepared form
//! - [`Response`] - fully buffered response
//! - [`Transport`] - the seam a network stack (or a test double) plugs into
//! - [`Error`] and [`Result`] - Error handling

mod accumulator;
mod error;
mod headers;
pub mod prelude;
mod request;
mod response;
mod timeout;
mod transport;
mod url_builder;

pub use accumulator::{BodyAccumulator, MAX_SIZE_HINT};
pub use error::{Error, Result, TransportErrorKind};
pub use headers::{HeaderLine, HeaderList};
pub use request::{GetRequest, PreparedRequest, RequestBuilder};
pub use response::Response;
pub use timeout::timeout_from_secs_f64;
pub use transport::{Exchange, Transport};
pub use url_builder::{build_url, encode_query};

// Re-export http crate types for status codes and headers
pub use http::{HeaderMap, StatusCode, header};
