//! Store operation counters.
//!
//! Lightweight atomic counters over the engine's public operations.
//! Useful for diagnostics and for asserting that a rejected request
//! never reached storage.

use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters for one [`Store`](crate::Store).
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub struct StoreStats {
    /// Total read operations (get, all, count, query runs).
    reads: AtomicU64,
    /// Total write operations (add, remove).
    writes: AtomicU64,
    /// Total persist calls.
    persists: AtomicU64,
}

impl StoreStats {
    /// Creates a zeroed counter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_persist(&self) {
        self.persists.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            persists: self.persists.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of a store's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Total read operations.
    pub reads: u64,
    /// Total write operations.
    pub writes: u64,
    /// Total persist calls.
    pub persists: u64,
}

impl StatsSnapshot {
    /// Returns `true` if no operation of any kind was recorded.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.reads == 0 && self.writes == 0 && self.persists == 0
    }
}
