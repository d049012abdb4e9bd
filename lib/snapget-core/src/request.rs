//! GET request description and preparation.
//!
//! Use [`GetRequest::builder`] to describe a call, then
//! [`PreparedRequest::prepare`] to turn it into a sendable request:
//!
//! ```
//! use std::time::Duration;
//! use snapget_core::{GetRequest, PreparedRequest};
//!
//! let request = GetRequest::builder("https://example.com/search")
//!     .query("q", "a b")
//!     .header("Accept", "application/json")
//!     .timeout(Duration::from_secs(5))
//!     .build();
//!
//! let prepared = PreparedRequest::prepare(&request, "snapget/doc")?;
//! assert_eq!(prepared.url().as_str(), "https://example.com/search?q=a%20b");
//! # Ok::<(), snapget_core::Error>(())
//! ```

use std::time::Duration;

use url::Url;

use crate::{HeaderList, Result, build_url, timeout_from_secs_f64};

/// Everything one GET call needs, before any validation.
#[derive(Debug, Clone)]
pub struct GetRequest {
    base_url: String,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl GetRequest {
    /// Creates a request without parameters, headers or timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            params: Vec::new(),
            headers: Vec::new(),
            timeout: None,
        }
    }

    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            request: Self::new(base_url),
        }
    }

    /// Base URL as supplied.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query parameters in order.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Headers in order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Whole-call timeout, `None` for unbounded.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Builder for [`GetRequest`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    request: GetRequest,
}

impl RequestBuilder {
    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.params.push((name.into(), value.into()));
        self
    }

    /// Appends multiple query parameters.
    #[must_use]
    pub fn query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request
            .params
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.push((name.into(), value.into()));
        self
    }

    /// Appends multiple headers.
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request
            .headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the whole-call timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    /// Sets the timeout from fractional seconds; see [`timeout_from_secs_f64`].
    #[must_use]
    pub fn timeout_secs(mut self, seconds: f64) -> Self {
        self.request.timeout = timeout_from_secs_f64(seconds);
        self
    }

    /// Builds the [`GetRequest`].
    #[must_use]
    pub fn build(self) -> GetRequest {
        self.request
    }
}

/// A request whose URL and header list are built and ready to send.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    url: Url,
    headers: HeaderList,
    timeout: Option<Duration>,
}

impl PreparedRequest {
    /// Build the URL, then assemble the headers with a default user agent.
    ///
    /// Nothing touches the network here; a URL failure stops preparation.
    pub fn prepare(request: &GetRequest, user_agent: &str) -> Result<Self> {
        let url = build_url(&request.base_url, request.params.iter().map(|(k, v)| (k, v)))?;
        let headers =
            HeaderList::from_pairs(request.headers.iter().cloned()).with_default_user_agent(user_agent);

        Ok(Self {
            url,
            headers,
            timeout: request.timeout,
        })
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Header lines to send.
    #[must_use]
    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    /// Whole-call timeout, `None` for unbounded.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Consume into the target URL.
    #[must_use]
    pub fn into_url(self) -> Url {
        self.url
    }
}
