//! HTTP response handling.
//!
//! [`Response`] is fully buffered: status, the URLs involved, headers and body
//! are all available once the call returns.
//!
//! # Example
//!
//! ```ignore
//! let response = snapget::get("https://example.com", &[], &[], 5.0)?;
//! if response.is_success() {
//!     println!("{}", response.text_lossy());
//! }
//! ```

use std::borrow::Cow;

use bytes::Bytes;
use http::HeaderMap;
use url::Url;

use crate::Error;

/// HTTP response with status, URLs, headers, and body.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    request_url: Url,
    final_url: Url,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(
        status: u16,
        request_url: Url,
        final_url: Url,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        Self {
            status,
            request_url,
            final_url,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// URL of the response the body came from, after redirects.
    #[must_use]
    pub fn final_url(&self) -> &Url {
        &self.final_url
    }

    /// URL built from the base URL and query parameters.
    #[must_use]
    pub fn request_url(&self) -> &Url {
        &self.request_url
    }

    /// Returns `true` if at least one redirect was followed.
    #[must_use]
    pub fn was_redirected(&self) -> bool {
        self.request_url != self.final_url
    }

    /// Response headers of the final hop.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if present and printable.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns `true` if the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 3xx.
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        self.status >= 300 && self.status < 400
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Turn a non-2xx status into [`Error::Http`].
    pub fn error_for_status(self) -> crate::Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Http {
                status: self.status,
                url: self.final_url,
            })
        }
    }

    /// Body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }

    /// Body as text, invalid UTF-8 sequences replaced.
    #[must_use]
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}
