//! One GET call, from description to buffered response.
//!
//! The call moves through `init -> prepared -> executing -> succeeded | failed`;
//! each transition is traced at `trace`/`debug` level. Nothing is shared
//! between calls: every call owns its URL, header list and body buffer.

use tracing::{debug, debug_span, trace, warn};

use crate::{
    BodyAccumulator, DEFAULT_USER_AGENT, GetRequest, PreparedRequest, Response, Result, Transport,
};

/// Execute `request` on `transport` with the default user agent.
///
/// This is the entry point for custom [`Transport`] implementations.
///
/// # Errors
///
/// - [`Error::MalformedUrl`](crate::Error::MalformedUrl) or
///   [`Error::UrlConstruction`](crate::Error::UrlConstruction) before any network activity
/// - [`Error::Transport`](crate::Error::Transport) when the round-trip fails
/// - [`Error::Allocation`](crate::Error::Allocation) when the body buffer cannot grow
pub fn execute_with<T: Transport + ?Sized>(transport: &T, request: &GetRequest) -> Result<Response> {
    execute(transport, request, DEFAULT_USER_AGENT)
}

pub(crate) fn execute<T: Transport + ?Sized>(
    transport: &T,
    request: &GetRequest,
    user_agent: &str,
) -> Result<Response> {
    let span = debug_span!("snapget_get", base_url = request.base_url());
    let _guard = span.enter();

    trace!(state = "init", "starting call");

    let prepared = match PreparedRequest::prepare(request, user_agent) {
        Ok(prepared) => prepared,
        Err(err) => {
            warn!(state = "failed", error = %err, "request preparation failed");
            return Err(err);
        }
    };
    trace!(
        state = "prepared",
        url = %prepared.url(),
        headers = prepared.headers().len(),
        "request prepared"
    );

    let mut body = BodyAccumulator::new();
    trace!(state = "executing", "sending request");

    match transport.perform(&prepared, &mut body) {
        Ok(exchange) => {
            let (status, final_url, headers) = exchange.into_parts();
            let body = body.finish();
            debug!(
                state = "succeeded",
                status,
                bytes = body.len(),
                final_url = %final_url,
                "call completed"
            );
            Ok(Response::new(
                status,
                prepared.into_url(),
                final_url,
                headers,
                body,
            ))
        }
        Err(err) => {
            warn!(state = "failed", error = %err, received = body.len(), "call failed");
            Err(err)
        }
    }
}
