//! Cache Instrumentation
//!
//! An [`InternCache`](crate::InternCache) reports into an optional sink
//! instead of compiled-in counters, so instrumentation can be switched on
//! per cache at runtime.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Receiver for cache events. All methods default to no-ops.
pub trait CacheMetrics: Send + Sync {
    /// An interning lookup finished after stepping over `walks` foreign slots
    fn record_lookup(&self, walks: usize, hit: bool) {
        let _ = (walks, hit);
    }

    /// The table was rehashed into a larger one
    fn record_grow(&self, old_capacity: usize, new_capacity: usize) {
        let _ = (old_capacity, new_capacity);
    }

    /// The table was cleared back to its initial capacity
    fn record_reset(&self) {}
}

/// Atomic counter sink
#[derive(Debug, Default)]
pub struct CacheStats {
    calls: AtomicU64,
    hits: AtomicU64,
    walks: AtomicU64,
    resets: AtomicU64,
    rehashes: AtomicU64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current counter values
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            calls: self.calls.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            walks: self.walks.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
            rehashes: self.rehashes.load(Ordering::Relaxed),
        }
    }
}

impl CacheMetrics for CacheStats {
    fn record_lookup(&self, walks: usize, hit: bool) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.walks.fetch_add(walks as u64, Ordering::Relaxed);
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_grow(&self, _old_capacity: usize, _new_capacity: usize) {
        self.rehashes.fetch_add(1, Ordering::Relaxed);
    }

    fn record_reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time view of [`CacheStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub calls: u64,
    pub hits: u64,
    pub walks: u64,
    pub resets: u64,
    pub rehashes: u64,
}

impl StatsSnapshot {
    /// Mean number of probe steps per lookup
    pub fn average_walk(&self) -> Option<f64> {
        (self.calls > 0).then(|| self.walks as f64 / self.calls as f64)
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.average_walk() {
            Some(avg) => write!(
                f,
                "average walk: {}/{} ({:.3}) hits={} resets={} rehash={}",
                self.walks, self.calls, avg, self.hits, self.resets, self.rehashes
            ),
            None => write!(f, "cache was not used"),
        }
    }
}
