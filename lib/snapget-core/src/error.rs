//! Error types for snapget.

use std::collections::TryReserveError;
use std::time::Duration;

use derive_more::{Display, Error, From};

// ============================================================================
// Transport Error Kinds
// ============================================================================

/// What went wrong during the network round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TransportErrorKind {
    /// DNS resolution or TCP connection failed.
    #[display("connect")]
    Connect,
    /// The whole-call timeout elapsed.
    #[display("timeout")]
    Timeout,
    /// TLS handshake failed.
    #[display("tls")]
    Tls,
    /// The request could not be sent as assembled (e.g. an illegal header).
    #[display("invalid request")]
    InvalidRequest,
    /// The peer violated the HTTP protocol or the body stream failed.
    #[display("protocol")]
    Protocol,
    /// A redirect could not be followed.
    #[display("redirect")]
    Redirect,
    /// The transfer was aborted locally, e.g. the body buffer could not grow.
    #[display("aborted")]
    Aborted,
    /// The I/O runtime could not be started or used from this thread.
    #[display("runtime")]
    Runtime,
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for snapget operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The response buffer could not be reserved.
    #[display("allocation failure: {_0}")]
    #[from]
    Allocation(TryReserveError),

    /// The base URL does not parse.
    #[display("malformed URL: {_0}")]
    #[from]
    MalformedUrl(url::ParseError),

    /// The base URL parses but no request URL can be built from it.
    #[display("cannot construct request URL: {_0}")]
    #[from(skip)]
    UrlConstruction(#[error(not(source))] String),

    /// The network round-trip failed.
    #[display("transport error ({kind}): {message}")]
    #[from(skip)]
    Transport {
        /// Failure category.
        kind: TransportErrorKind,
        /// Human-readable diagnostic.
        message: String,
    },

    /// Non-success status, only produced by [`crate::Response::error_for_status`].
    #[display("HTTP status {status} for {url}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// URL that answered with this status.
        #[error(not(source))]
        url: url::Url,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a transport error.
    #[must_use]
    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Create the error reported when the whole-call bound elapses.
    #[must_use]
    pub fn timeout(limit: Duration) -> Self {
        Self::transport(
            TransportErrorKind::Timeout,
            format!("operation timed out after {} milliseconds", limit.as_millis()),
        )
    }

    /// Create a URL construction error.
    #[must_use]
    pub fn url_construction(message: impl Into<String>) -> Self {
        Self::UrlConstruction(message.into())
    }

    /// Returns the transport failure category, if this is a transport error.
    #[must_use]
    pub const fn transport_kind(&self) -> Option<TransportErrorKind> {
        match self {
            Self::Transport { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns `true` if this is a transport error.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` if the whole-call timeout elapsed.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            }
        )
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connect(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportErrorKind::Connect,
                ..
            }
        )
    }

    /// Returns `true` if the URL could not be parsed or built.
    #[must_use]
    pub const fn is_url(&self) -> bool {
        matches!(self, Self::MalformedUrl(_) | Self::UrlConstruction(_))
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
