//! Request/response logging middleware.
//!
//! This middleware logs requests and response heads using the `tracing` crate.

use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::hop::{HopRequest, HopResponse, ServiceFuture};
use crate::{Error, LogLevel, Result};

/// Layer that adds request/response logging.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoggingLayer {
    level: LogLevel,
}

impl LoggingLayer {
    /// `None` when logging is switched off.
    pub(crate) fn for_level(level: LogLevel) -> Option<Self> {
        match level {
            LogLevel::Off => None,
            LogLevel::Info | LogLevel::Debug => Some(Self { level }),
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs requests and responses.
#[derive(Debug, Clone)]
pub(crate) struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Service<HopRequest> for Logging<S>
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
        let url = request.url.to_string();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", method = "GET", %url);

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();

                if level == LogLevel::Debug {
                    debug!(url = %url, headers = ?request.headers, "sending request");
                } else {
                    info!(url = %url, "sending request");
                }

                let result = inner.call(request).await;

                // Saturating conversion to u64 (truncates after ~584 million years)
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        let status = response.status();
                        if level == LogLevel::Debug {
                            debug!(
                                status,
                                elapsed_ms,
                                final_url = %response.url,
                                headers = ?response.response.headers(),
                                "response received"
                            );
                        } else if response.response.status().is_success() {
                            info!(status, elapsed_ms, "response received");
                        } else {
                            warn!(status, elapsed_ms, "response received with HTTP error");
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
