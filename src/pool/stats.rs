//! Pool statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics tracked by the shared pool.
///
/// All fields are atomic for lock-free, thread-safe updates.
/// Multiple threads can increment counters without locks.
///
/// # Memory Ordering
/// We use `Ordering::Relaxed` for all operations because:
/// - We only need atomicity (no partial updates)
/// - We don't need synchronization between different counters
/// - Statistics are "eventually consistent" - exact ordering doesn't matter
#[derive(Debug, Default)]
pub struct PoolStats {
    /// Number of buffers handed out by `rent`.
    pub rented: AtomicU64,

    /// Number of buffers accepted back by `recycle`.
    pub returned: AtomicU64,

    /// Number of rents served by a fresh allocation.
    pub allocated: AtomicU64,

    /// Number of rents served from a free list.
    pub reused: AtomicU64,

    /// Number of returned buffers dropped at the retention cap.
    pub discarded: AtomicU64,
}

impl PoolStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of rents served from a free list (0.0 to 1.0).
    pub fn reuse_rate(&self) -> f64 {
        let rented = self.rented.load(Ordering::Relaxed);
        if rented == 0 {
            0.0
        } else {
            self.reused.load(Ordering::Relaxed) as f64 / rented as f64
        }
    }

    /// Get a snapshot of current statistics.
    ///
    /// This returns a non-atomic copy for display/logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            rented: self.rented.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            allocated: self.allocated.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.rented.store(0, Ordering::Relaxed);
        self.returned.store(0, Ordering::Relaxed);
        self.allocated.store(0, Ordering::Relaxed);
        self.reused.store(0, Ordering::Relaxed);
        self.discarded.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time snapshot of pool statistics.
///
/// Unlike `PoolStats`, this is not atomic and can be safely
/// printed, compared, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub rented: u64,
    pub returned: u64,
    pub allocated: u64,
    pub reused: u64,
    pub discarded: u64,
}

impl StatsSnapshot {
    /// Fraction of rents served from a free list (0.0 to 1.0).
    pub fn reuse_rate(&self) -> f64 {
        if self.rented == 0 {
            0.0
        } else {
            self.reused as f64 / self.rented as f64
        }
    }

    /// Number of rented buffers not yet returned.
    pub fn outstanding(&self) -> u64 {
        self.rented - self.returned
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool {{ rented: {}, returned: {}, reuse_rate: {:.2}% }}",
            self.rented,
            self.returned,
            self.reuse_rate() * 100.0
        )
    }
}
