//! The transport seam.
//!
//! - [`Transport`] - performs one prepared request, feeding the body to a sink
//! - [`Exchange`] - what the transport reports once the round-trip completed
//!
//! The real implementation lives in the `snapget` crate; tests plug in doubles.

use http::HeaderMap;
use url::Url;

use crate::{BodyAccumulator, PreparedRequest, Result};

/// Outcome of a completed round-trip; the body went to the accumulator.
#[derive(Debug, Clone)]
pub struct Exchange {
    status: u16,
    url: Url,
    headers: HeaderMap,
}

impl Exchange {
    /// Creates a new exchange.
    #[must_use]
    pub fn new(status: u16, url: Url, headers: HeaderMap) -> Self {
        Self {
            status,
            url,
            headers,
        }
    }

    /// HTTP status code of the final hop.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// URL of the final hop.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Response headers of the final hop.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Consume into (status, url, headers).
    #[must_use]
    pub fn into_parts(self) -> (u16, Url, HeaderMap) {
        (self.status, self.url, self.headers)
    }
}

/// Blocking HTTP transport.
///
/// Implementations must follow redirects, honour
/// [`PreparedRequest::timeout`] over the whole call, and push body chunks into
/// `body` in arrival order.
pub trait Transport {
    /// Perform the request, blocking until the body is complete.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] for any failure during the
    /// round-trip, including a failed [`BodyAccumulator::push`].
    fn perform(&self, request: &PreparedRequest, body: &mut BodyAccumulator) -> Result<Exchange>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn perform(&self, request: &PreparedRequest, body: &mut BodyAccumulator) -> Result<Exchange> {
        (**self).perform(request, body)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn perform(&self, request: &PreparedRequest, body: &mut BodyAccumulator) -> Result<Exchange> {
        (**self).perform(request, body)
    }
}
