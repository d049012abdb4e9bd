//! Single-call blocking HTTP GET client.
//!
//! One call builds the URL from a base and query parameters, sends the
//! headers, follows redirects, waits at most the given timeout and hands back
//! the whole body in memory together with the status code.
//!
//! # Example
//!
//! ```no_run
//! let response = snapget::get(
//!     "https://example.com/search",
//!     &[("q", "a b"), ("q", "c")],
//!     &[("Accept", "application/json")],
//!     5.0,
//! )?;
//!
//! assert_eq!(response.request_url().as_str(), "https://example.com/search?q=a%20b&q=c");
//! if response.is_success() {
//!     println!("{}", response.text_lossy());
//! }
//! # Ok::<(), snapget::Error>(())
//! ```
//!
//! The call blocks the current thread. Network I/O runs on a process-wide
//! runtime started on first use. From async code, call it through
//! `tokio::task::spawn_blocking`; a call made directly inside an async task is
//! refused with a [`TransportErrorKind::Runtime`] error.
//!
//! Request logging through `tracing` is off unless enabled with
//! [`ClientBuilder::with_logging`].

mod client;
mod config;
mod connector;
mod executor;
mod hop;
mod middleware;
pub mod prelude;
mod runtime;
mod transport;

pub use client::{Client, ClientBuilder, get};
pub use config::{
    ClientConfig, ClientConfigBuilder, DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT, LogLevel,
    TlsPolicy,
};
pub use executor::execute_with;

// Re-export core types
pub use snapget_core::{
    BodyAccumulator, Error, Exchange, GetRequest, HeaderLine, HeaderList, MAX_SIZE_HINT,
    PreparedRequest, RequestBuilder, Response, Result, Transport, TransportErrorKind, build_url,
    encode_query, timeout_from_secs_f64,
};

// Re-export http types for status codes and headers
pub use snapget_core::{HeaderMap, StatusCode, header};

// Re-export url for callers inspecting response URLs
pub use url;
