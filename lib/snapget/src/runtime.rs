//! Process-wide I/O runtime behind the blocking API.

use std::sync::OnceLock;

use tokio::runtime::{Builder, Runtime};

use crate::{Error, Result, TransportErrorKind};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// The shared runtime, started on first use.
pub(crate) fn shared() -> Result<&'static Runtime> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }

    let runtime = Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("snapget-io")
        .enable_all()
        .build()
        .map_err(|err| runtime_error(format!("failed to start I/O runtime: {err}")))?;

    // Lost the race: another thread installed its runtime first.
    if let Err(spare) = RUNTIME.set(runtime) {
        spare.shutdown_background();
    }

    RUNTIME
        .get()
        .ok_or_else(|| runtime_error("I/O runtime unavailable"))
}

/// Refuse to block a thread that is polling an async task.
///
/// Threads from `spawn_blocking`, plain threads and the root future of a
/// `block_on` are accepted: the call waits on a channel fed by the shared
/// runtime, never on the caller's runtime.
pub(crate) fn ensure_blocking_context() -> Result<()> {
    if let Some(task) = tokio::task::try_id() {
        return Err(runtime_error(format!(
            "blocking call made from async task {task}; move it to `spawn_blocking`"
        )));
    }
    Ok(())
}

pub(crate) fn runtime_error(message: impl Into<String>) -> Error {
    Error::transport(TransportErrorKind::Runtime, message)
}
