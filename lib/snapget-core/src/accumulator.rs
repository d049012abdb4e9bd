//! Response body accumulation.

use std::collections::TryReserveError;

use bytes::Bytes;

use crate::Result;

/// Largest up-front reservation taken from a `Content-Length` hint.
pub const MAX_SIZE_HINT: usize = 1024 * 1024;

/// Append-only buffer fed with body chunks in arrival order.
#[derive(Debug, Default)]
pub struct BodyAccumulator {
    buffer: Vec<u8>,
}

impl BodyAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room for an announced body length, capped at [`MAX_SIZE_HINT`].
    pub fn reserve_hint(&mut self, hint: u64) -> Result<()> {
        let wanted = usize::try_from(hint).map_or(MAX_SIZE_HINT, |n| n.min(MAX_SIZE_HINT));
        self.buffer.try_reserve(wanted)?;
        Ok(())
    }

    /// Append one chunk.
    ///
    /// On failure the buffer is left untouched and the transfer must stop.
    pub fn push(&mut self, chunk: &[u8]) -> std::result::Result<(), TryReserveError> {
        self.buffer.try_reserve(chunk.len())?;
        self.buffer.extend_from_slice(chunk);
        Ok(())
    }

    /// Total bytes received so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if nothing was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Bytes received so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Hand the accumulated body over.
    #[must_use]
    pub fn finish(self) -> Bytes {
        Bytes::from(self.buffer)
    }
}
