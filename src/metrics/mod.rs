//! Metrics collection module
//!
//! Tracks fetch dispatch, cache effectiveness, and supersession counts for
//! a suggestion session. Purely in-process; hosts read snapshots for debug
//! surfaces.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single suggestion session.
#[derive(Debug)]
pub struct SessionMetrics {
    fetches_dispatched: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    stale_drops: AtomicU64,
    fetch_failures: AtomicU64,
    resolutions: AtomicU64,
    resolution_failures: AtomicU64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            fetches_dispatched: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            stale_drops: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
            resolutions: AtomicU64::new(0),
            resolution_failures: AtomicU64::new(0),
        }
    }

    /// Record a network fetch leaving the client.
    pub fn record_fetch(&self) {
        self.fetches_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup served from the response cache.
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that had to go to the network.
    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a response discarded because its request was superseded.
    pub fn record_stale_drop(&self) {
        self.stale_drops.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed suggestion fetch.
    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a pending-suggestion resolution attempt.
    pub fn record_resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a resolution that fell back to unresolved data.
    pub fn record_resolution_failure(&self) {
        self.resolution_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fetches_dispatched: self.fetches_dispatched.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            stale_drops: self.stale_drops.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            resolution_failures: self.resolution_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time counter values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub fetches_dispatched: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub stale_drops: u64,
    pub fetch_failures: u64,
    pub resolutions: u64,
    pub resolution_failures: u64,
}
