//! The growable byte buffer a feed is written into.

use crate::error::{FeedError, FeedResult};
use crate::status::FeedStatus;
use std::io::{self, Write};
use std::sync::Arc;

/// Largest number of bytes reserved when a buffer is created.
pub const INITIAL_RESERVATION: usize = 1024 * 1024;

/// Accumulated feed bytes plus the counters published to observers.
///
/// The buffer only grows, except through [`FeedBuffer::truncate`], which
/// discards a partially written record. Every write republishes the size
/// so observers can follow a slow content read.
#[derive(Debug)]
pub struct FeedBuffer {
    data: Vec<u8>,
    status: Arc<FeedStatus>,
}

impl FeedBuffer {
    /// Creates an empty buffer for a feed of `capacity` bytes.
    ///
    /// At most [`INITIAL_RESERVATION`] bytes are reserved up front; the
    /// buffer grows as records arrive.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity.min(INITIAL_RESERVATION)),
            status: Arc::new(FeedStatus::new(capacity)),
        }
    }

    /// Appends bytes.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
        self.status.set_size(self.data.len());
    }

    /// Discards everything after the first `size` bytes.
    ///
    /// The record count is left alone; callers that counted a discarded
    /// record must adjust it themselves.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidTruncate`] if `size` exceeds the current size.
    pub fn truncate(&mut self, size: usize) -> FeedResult<()> {
        let current = self.data.len();
        if size > current {
            return Err(FeedError::InvalidTruncate {
                requested: size,
                current,
            });
        }
        self.data.truncate(size);
        self.status.set_size(size);
        Ok(())
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns the shared counters.
    pub fn status(&self) -> &Arc<FeedStatus> {
        &self.status
    }
}

impl Write for FeedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
