//! HTTP transport implementation using hyper-util.

use std::future::Future;
use std::pin::Pin;
use std::sync::mpsc;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http_body_util::{BodyExt, Empty};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tokio::runtime::Runtime;
use tower::util::BoxCloneService;
use tower::{Layer, Service};

use crate::hop::{BoxedService, HopRequest, HopResponse, SyncService};
use crate::middleware::{FollowRedirectLayer, LoggingLayer};
use crate::{
    BodyAccumulator, ClientConfig, Error, Exchange, PreparedRequest, Result, Transport,
    TransportErrorKind, connector::https_connector, runtime,
};

// ============================================================================
// Raw Client (one hop, no middleware)
// ============================================================================

/// Raw HTTP client using hyper-util.
#[derive(Clone)]
struct RawHyperClient {
    inner: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
}

impl RawHyperClient {
    fn new(config: &ClientConfig) -> Self {
        let connector = https_connector(config.tls);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner }
    }

    /// Build a hyper GET request; the fragment never goes on the wire.
    fn build_hyper_request(request: &HopRequest) -> Result<http::Request<Empty<Bytes>>> {
        let mut target = request.url.clone();
        target.set_fragment(None);

        let mut http_request = http::Request::builder()
            .method(http::Method::GET)
            .uri(target.as_str())
            .body(Empty::new())
            .map_err(|e| Error::transport(TransportErrorKind::InvalidRequest, e.to_string()))?;
        http_request.headers_mut().clone_from(&request.headers);

        Ok(http_request)
    }

    async fn execute(&self, request: HopRequest) -> Result<HopResponse> {
        let hyper_request = Self::build_hyper_request(&request)?;

        let response = self
            .inner
            .request(hyper_request)
            .await
            .map_err(Self::map_hyper_error)?;

        let response = response.map(|body| {
            body.map_err(|err| {
                Error::transport(
                    TransportErrorKind::Protocol,
                    format!("failed to read response body: {}", error_chain(&err)),
                )
            })
            .boxed_unsync()
        });

        Ok(HopResponse::new(request.url, response))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = error_chain(&err);
        let lowered = msg.to_ascii_lowercase();

        if lowered.contains("ssl") || lowered.contains("tls") || lowered.contains("certificate") {
            return Error::transport(TransportErrorKind::Tls, msg);
        }

        if err.is_connect() {
            return Error::transport(TransportErrorKind::Connect, msg);
        }

        Error::transport(TransportErrorKind::Protocol, msg)
    }
}

/// Render an error with all its sources, outermost first.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl Service<HopRequest> for RawHyperClient {
    type Response = HopResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send + 'static>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: HopRequest) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.execute(request).await })
    }
}

// ============================================================================
// Blocking Transport
// ============================================================================

/// Blocking [`Transport`] driving the hop stack on the shared runtime.
///
/// Each call runs as a task on the shared runtime; the calling thread only
/// waits for its outcome.
pub(crate) struct HyperTransport {
    service: SyncService,
    runtime: &'static Runtime,
}

impl HyperTransport {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        let runtime = runtime::shared()?;

        let mut service: BoxedService = BoxCloneService::new(RawHyperClient::new(config));
        if config.max_redirects > 0 {
            let layer = FollowRedirectLayer::with_max_redirects(config.max_redirects);
            service = BoxCloneService::new(layer.layer(service));
        }
        if let Some(layer) = LoggingLayer::for_level(config.log_level) {
            service = BoxCloneService::new(layer.layer(service));
        }

        Ok(Self {
            service: SyncService::new(service),
            runtime,
        })
    }
}

/// Send the request and stream the final body into `body`.
async fn exchange(
    service: &SyncService,
    request: HopRequest,
    body: &mut BodyAccumulator,
) -> Result<Exchange> {
    let HopResponse { url, response } = service.call(request).await?;
    let (parts, mut stream) = response.into_parts();

    if let Some(length) = content_length(&parts.headers) {
        body.reserve_hint(length)?;
    }

    while let Some(frame) = stream.frame().await {
        let Ok(data) = frame?.into_data() else {
            continue;
        };
        body.push(&data).map_err(|err| {
            Error::transport(
                TransportErrorKind::Aborted,
                format!("transfer aborted after {} bytes: {err}", body.len()),
            )
        })?;
    }

    Ok(Exchange::new(parts.status.as_u16(), url, parts.headers))
}

/// Run [`exchange`] under the whole-call bound, if any.
async fn bounded_exchange(
    service: &SyncService,
    request: HopRequest,
    limit: Option<Duration>,
    body: &mut BodyAccumulator,
) -> Result<Exchange> {
    let pending = exchange(service, request, body);
    let Some(limit) = limit else {
        return pending.await;
    };
    tokio::time::timeout(limit, pending)
        .await
        .unwrap_or_else(|_| Err(Error::timeout(limit)))
}

fn content_length(headers: &http::HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

impl Transport for HyperTransport {
    fn perform(&self, request: &PreparedRequest, body: &mut BodyAccumulator) -> Result<Exchange> {
        runtime::ensure_blocking_context()?;

        let headers = request.headers().to_header_map()?;
        let hop = HopRequest::new(request.url().clone(), headers);
        let limit = request.timeout();
        let service = self.service.clone();

        let (sender, receiver) = mpsc::sync_channel(1);
        drop(self.runtime.spawn(async move {
            let mut sink = BodyAccumulator::new();
            let result = bounded_exchange(&service, hop, limit, &mut sink).await;
            // The caller only goes away by unwinding.
            let _ = sender.send((result, sink));
        }));

        let (result, sink) = receiver
            .recv()
            .map_err(|_| runtime::runtime_error("I/O task ended without an outcome"))?;
        *body = sink;
        result
    }
}
