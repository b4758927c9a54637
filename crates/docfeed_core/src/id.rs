//! Feed identifiers.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of unique feed identifiers.
///
/// Handed to [`crate::FeedEncoder::open`] so that tests can substitute a
/// deterministic sequence.
pub trait UniqueIdGenerator: Send + Sync {
    /// Returns a new identifier, never returned before by this generator.
    fn next_id(&self) -> String;
}

/// Generates random version 4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl UniqueIdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Generates `prefix-0`, `prefix-1`, ...
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator starting at zero.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl UniqueIdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_is_unique() {
        let ids = UuidGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn uuid_parses() {
        let id = UuidGenerator.next_id();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn sequential() {
        let ids = SequentialIdGenerator::new("feed");
        assert_eq!(ids.next_id(), "feed-0");
        assert_eq!(ids.next_id(), "feed-1");
    }
}
