//! Request/response types flowing through the tower stack.
//!
//! One [`HopRequest`] is one HTTP exchange; redirects produce further hops.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::HeaderMap;
use http_body_util::combinators::UnsyncBoxBody;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use url::Url;

use crate::{Error, Result};

/// Response body of a hop, errors already mapped.
pub(crate) type HopBody = UnsyncBoxBody<Bytes, Error>;

/// Type-erased service for middleware composition.
pub(crate) type BoxedService = BoxCloneService<HopRequest, HopResponse, Error>;

/// Future type for the hop services.
pub(crate) type ServiceFuture = Pin<Box<dyn Future<Output = Result<HopResponse>> + Send + 'static>>;

/// A GET to send: target URL and headers.
#[derive(Debug, Clone)]
pub(crate) struct HopRequest {
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
}

impl HopRequest {
    pub(crate) fn new(url: Url, headers: HeaderMap) -> Self {
        Self { url, headers }
    }
}

/// Response head for a hop, with the URL that produced it.
pub(crate) struct HopResponse {
    pub(crate) url: Url,
    pub(crate) response: http::Response<HopBody>,
}

impl HopResponse {
    pub(crate) fn new(url: Url, response: http::Response<HopBody>) -> Self {
        Self { url, response }
    }

    pub(crate) fn status(&self) -> u16 {
        self.response.status().as_u16()
    }
}

/// Thread-safe wrapper for [`BoxedService`].
///
/// `BoxCloneService` is not `Sync`; the lock is only held to clone it.
#[derive(Clone)]
pub(crate) struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    pub(crate) fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    pub(crate) fn call(&self, request: HopRequest) -> ServiceFuture {
        let service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(service.oneshot(request))
    }
}
