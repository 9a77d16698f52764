//! The default page buffer pool.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::trace;

use crate::common::config::DEFAULT_MAX_POOLED;
use crate::pool::{PagePool, PoolStats, StatsSnapshot};

/// A thread-safe pool of page buffers with size-keyed free lists.
///
/// Buffers are keyed by exact length: page sizes are not required to be
/// powers of two, so there is no bucketing or rounding. Each size class
/// retains at most `max_retained` buffers; returns beyond the cap are
/// dropped.
///
/// # Thread Safety
/// - `free`: `Mutex` — always modified on rent and recycle
/// - `stats`: No lock — all atomic counters
///
/// # Usage
/// ```
/// use cowstream::{PagePool, SharedPool};
///
/// let pool = SharedPool::new();
/// let buf = pool.rent(4096);
/// assert!(buf.iter().all(|&b| b == 0));
/// pool.recycle(buf);
/// assert_eq!(pool.stats().returned, 1);
/// ```
#[derive(Debug)]
pub struct SharedPool {
    /// Free lists keyed by buffer length.
    free: Mutex<HashMap<usize, Vec<Vec<u8>>>>,

    /// Retention cap per size class (immutable after construction).
    max_retained: usize,

    /// Rent/return accounting.
    stats: PoolStats,
}

impl SharedPool {
    /// Create a pool with the default retention cap.
    pub fn new() -> Self {
        Self::with_max_retained(DEFAULT_MAX_POOLED)
    }

    /// Create a pool retaining at most `max_retained` buffers per size.
    ///
    /// A cap of 0 disables retention entirely: every recycled buffer is
    /// dropped and every rent allocates.
    pub fn with_max_retained(max_retained: usize) -> Self {
        Self {
            free: Mutex::new(HashMap::new()),
            max_retained,
            stats: PoolStats::new(),
        }
    }

    /// Get a snapshot of the pool's counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of buffers currently held on the free list for `len`.
    pub fn retained(&self, len: usize) -> usize {
        self.free.lock().get(&len).map_or(0, Vec::len)
    }
}

impl Default for SharedPool {
    fn default() -> Self {
        Self::new()
    }
}

impl PagePool for SharedPool {
    fn rent(&self, len: usize) -> Vec<u8> {
        use std::sync::atomic::Ordering;

        self.stats.rented.fetch_add(1, Ordering::Relaxed);

        let reused = self.free.lock().get_mut(&len).and_then(Vec::pop);
        match reused {
            Some(mut buf) => {
                // Re-zero before hand-out so every rent observes the same
                // contents regardless of where the buffer has been.
                buf.fill(0);
                self.stats.reused.fetch_add(1, Ordering::Relaxed);
                trace!("reusing pooled buffer of {} bytes", len);
                buf
            }
            None => {
                self.stats.allocated.fetch_add(1, Ordering::Relaxed);
                trace!("allocating fresh buffer of {} bytes", len);
                vec![0u8; len]
            }
        }
    }

    fn recycle(&self, buf: Vec<u8>) {
        use std::sync::atomic::Ordering;

        self.stats.returned.fetch_add(1, Ordering::Relaxed);

        let len = buf.len();
        let mut free = self.free.lock();
        let list = free.entry(len).or_default();
        if list.len() < self.max_retained {
            list.push(buf);
        } else {
            self.stats.discarded.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_rent_is_zero_filled() {
        let pool = SharedPool::new();
        let buf = pool.rent(64);
        assert_eq!(buf.len(), 64);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_recycle_then_rent_reuses() {
        let pool = SharedPool::new();
        let mut buf = pool.rent(16);
        buf[3] = 0xAB;
        pool.recycle(buf);

        let buf = pool.rent(16);
        // Reused, and re-zeroed on the way out.
        assert!(buf.iter().all(|&b| b == 0));

        let stats = pool.stats();
        assert_eq!(stats.rented, 2);
        assert_eq!(stats.allocated, 1);
        assert_eq!(stats.reused, 1);
    }

    #[test]
    fn test_size_classes_are_independent() {
        let pool = SharedPool::new();
        pool.recycle(vec![0u8; 8]);
        pool.recycle(vec![0u8; 16]);

        assert_eq!(pool.retained(8), 1);
        assert_eq!(pool.retained(16), 1);

        let buf = pool.rent(8);
        assert_eq!(buf.len(), 8);
        assert_eq!(pool.retained(8), 0);
        assert_eq!(pool.retained(16), 1);
    }

    #[test]
    fn test_retention_cap() {
        let pool = SharedPool::with_max_retained(2);
        for _ in 0..5 {
            pool.recycle(vec![0u8; 4]);
        }

        assert_eq!(pool.retained(4), 2);
        let stats = pool.stats();
        assert_eq!(stats.returned, 5);
        assert_eq!(stats.discarded, 3);
    }

    #[test]
    fn test_zero_cap_disables_retention() {
        let pool = SharedPool::with_max_retained(0);
        pool.recycle(vec![0u8; 4]);
        assert_eq!(pool.retained(4), 0);
    }

    #[test]
    fn test_concurrent_rent_recycle() {
        let pool = Arc::new(SharedPool::new());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let buf = pool.rent(32);
                        pool.recycle(buf);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let stats = pool.stats();
        assert_eq!(stats.rented, 400);
        assert_eq!(stats.returned, 400);
    }
}
