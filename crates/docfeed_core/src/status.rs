//! Feed fullness and progress counters.
//!
//! A [`FeedStatus`] is shared between the encoder that writes a feed and
//! any number of observers (a monitoring thread, a scheduler deciding when
//! to flush). All counters are atomic, so an observer never sees a torn
//! value, but two counters read one after the other may straddle a write.
//!
//! # Usage
//!
//! ```rust,ignore
//! let status = encoder.status();
//! std::thread::spawn(move || loop {
//!     tracing::info!(records = status.record_count(), bytes = status.size());
//!     std::thread::sleep(std::time::Duration::from_secs(1));
//! });
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A batch is full when fewer than this many average records still fit.
pub const FULL_WHEN_FEWER_THAN: usize = 3;

/// A batch is not full when more than this many average records still fit.
pub const NOT_FULL_WHEN_MORE_THAN: usize = 10;

/// In between, a batch is full once the free space drops below
/// `capacity / FULL_SPACE_DIVISOR` (10%).
pub const FULL_SPACE_DIVISOR: usize = 10;

/// Point-in-time counters of one feed.
#[derive(Debug)]
pub struct FeedStatus {
    capacity: usize,
    record_count: AtomicUsize,
    size: AtomicUsize,
    closed: AtomicBool,
}

/// A copy of the counters taken at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Records written so far.
    pub record_count: usize,
    /// Bytes written so far, prolog and epilog included.
    pub size: usize,
    /// Whether the epilog has been written.
    pub closed: bool,
}

impl FeedStatus {
    /// Creates counters for a feed of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            record_count: AtomicUsize::new(0),
            size: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn set_size(&self, size: usize) {
        self.size.store(size, Ordering::Release);
    }

    pub(crate) fn add_records(&self, count: usize) {
        self.record_count.fetch_add(count, Ordering::AcqRel);
    }

    pub(crate) fn set_record_count(&self, count: usize) {
        self.record_count.store(count, Ordering::Release);
    }

    pub(crate) fn mark_closed(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Returns the capacity the fullness heuristic measures against.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of records written.
    pub fn record_count(&self) -> usize {
        self.record_count.load(Ordering::Acquire)
    }

    /// Returns the number of bytes written.
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    /// Returns true once the epilog is written.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Returns a copy of all counters.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            record_count: self.record_count(),
            size: self.size(),
            closed: self.is_closed(),
        }
    }

    /// Returns true if the feed should be sent now.
    ///
    /// See [`is_full`] for the heuristic.
    pub fn is_full(&self) -> bool {
        is_full(self.capacity, self.size(), self.record_count())
    }
}

/// Decides whether a feed of `size` bytes holding `record_count` records is
/// full, measured against `capacity`.
///
/// With `avg = size / record_count` and `left = capacity - size`:
/// full if `left < 3 * avg`, not full if `left > 10 * avg`, otherwise full
/// only when `left` is below 10% of `capacity`. A feed without records is
/// full only once it has no room left at all.
pub fn is_full(capacity: usize, size: usize, record_count: usize) -> bool {
    let bytes_left = capacity.saturating_sub(size);
    if record_count == 0 {
        return bytes_left == 0;
    }
    let avg_record_size = size / record_count;
    if bytes_left < FULL_WHEN_FEWER_THAN.saturating_mul(avg_record_size) {
        true
    } else if bytes_left > NOT_FULL_WHEN_MORE_THAN.saturating_mul(avg_record_size) {
        false
    } else {
        bytes_left < capacity / FULL_SPACE_DIVISOR
    }
}
