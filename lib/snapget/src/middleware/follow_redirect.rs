//! Redirect-following middleware.
//!
//! Follows 3xx responses carrying a `Location` header, up to a maximum number
//! of hops. Relative locations are resolved against the URL of the hop that
//! answered. Every hop is a GET with the original headers; `Authorization`
//! and `Cookie` are dropped once the redirect leaves the original origin.

use std::task::{Context, Poll};

use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE, LOCATION};
use tower::{Layer, Service};
use tracing::debug;
use url::Url;

use crate::hop::{HopRequest, HopResponse, ServiceFuture};
use crate::{Error, Result, TransportErrorKind};

/// Layer that follows HTTP redirects.
#[derive(Debug, Clone)]
pub(crate) struct FollowRedirectLayer {
    max_redirects: usize,
}

impl FollowRedirectLayer {
    pub(crate) fn with_max_redirects(max_redirects: usize) -> Self {
        Self { max_redirects }
    }
}

impl<S> Layer<S> for FollowRedirectLayer {
    type Service = FollowRedirect<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FollowRedirect {
            inner,
            max_redirects: self.max_redirects,
        }
    }
}

/// Service that follows HTTP redirects.
#[derive(Debug, Clone)]
pub(crate) struct FollowRedirect<S> {
    inner: S,
    max_redirects: usize,
}

/// Statuses answered with another hop.
fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

fn redirect_error(message: impl Into<String>) -> Error {
    Error::transport(TransportErrorKind::Redirect, message)
}

/// The `Location` of a redirect response, which must be present and visible ASCII.
fn location_header(headers: &HeaderMap) -> Result<&str> {
    let value = headers
        .get(LOCATION)
        .ok_or_else(|| redirect_error("redirect response missing Location header"))?;
    value.to_str().map_err(|_| {
        redirect_error(format!(
            "invalid Location header `{}`",
            String::from_utf8_lossy(value.as_bytes())
        ))
    })
}

/// Resolve a redirect Location URL relative to the URL that answered.
fn resolve_redirect_url(base_url: &Url, location: &str) -> Result<Url> {
    let url = base_url
        .join(location)
        .map_err(|err| redirect_error(format!("invalid Location `{location}`: {err}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(redirect_error(format!("refusing to follow redirect to `{url}`")));
    }
    Ok(url)
}

/// Build the next hop, dropping credentials when the origin changes.
fn next_hop(current: HopRequest, location: Url) -> HopRequest {
    let HopRequest { url, mut headers } = current;
    if url.origin() != location.origin() {
        headers.remove(AUTHORIZATION);
        headers.remove(COOKIE);
    }
    HopRequest::new(location, headers)
}

impl<S> Service<HopRequest> for FollowRedirect<S>
where
    S: Service<HopRequest, Response = HopResponse, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = HopResponse;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: HopRequest) -> Self::Future {
        let mut inner = self.inner.clone();
        let max_redirects = self.max_redirects;

        Box::pin(async move {
            let mut current_request = request;
            let mut redirects = 0;

            loop {
                let response = inner.call(current_request.clone()).await?;

                if !is_redirect(response.status()) {
                    return Ok(response);
                }

                if redirects >= max_redirects {
                    return Err(redirect_error(format!(
                        "maximum ({max_redirects}) redirects followed"
                    )));
                }

                let location = location_header(response.response.headers())?;
                let new_url = resolve_redirect_url(&response.url, location)?;
                debug!(
                    status = response.status(),
                    from = %response.url,
                    to = %new_url,
                    "following redirect"
                );

                current_request = next_hop(current_request, new_url);
                redirects += 1;
            }
        })
    }
}
