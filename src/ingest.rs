//! Fixed-capacity accumulator for the incoming tune image.
//!
//! A SID tune is a complete machine-code program; the emulator needs the
//! whole image before anything can play. Upstream pushes it in arbitrary
//! chunks and the buffer grows until end-of-input arrives.

use crate::error::{Result, SidDecError};

/// Hard upper bound for an ingested tune image (32 KiB, eight default-sized
/// output blocks — far more than any real SID program).
pub const TUNE_CAPACITY: usize = 32 * 1024;

/// Accumulates pushed byte chunks into one contiguous tune image.
#[derive(Debug)]
pub struct TuneBuffer {
    data: Vec<u8>,
    capacity: usize,
}

impl TuneBuffer {
    /// Create an empty buffer with the default [`TUNE_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(TUNE_CAPACITY)
    }

    /// Create an empty buffer with an explicit capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        TuneBuffer {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a chunk, returning the updated length.
    ///
    /// Fails with [`SidDecError::IngestOverflow`] if the chunk would push the
    /// image past capacity; a tune that large cannot be decoded by this
    /// element and the stream is fatally broken.
    pub fn append(&mut self, chunk: &[u8]) -> Result<usize> {
        if self.data.len() + chunk.len() > self.capacity {
            return Err(SidDecError::IngestOverflow {
                capacity: self.capacity,
            });
        }
        self.data.extend_from_slice(chunk);
        Ok(self.data.len())
    }

    /// Bytes accumulated so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been ingested yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drop the accumulated image for a fresh ingest cycle.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// The contiguous tune image.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Default for TuneBuffer {
    fn default() -> Self {
        Self::new()
    }
}
