//! Page buffer pooling.
//!
//! Materializing a page rents a buffer instead of allocating one, and
//! dropping a stream recycles every rented buffer. The pool is an
//! explicitly injected capability rather than a process-wide singleton,
//! so tests can substitute a counting pool and assert exact rent/return
//! balances.
//!
//! # Components
//! - [`PagePool`] - The rent/recycle capability streams are built over
//! - [`SharedPool`] - Default thread-safe implementation with free lists
//! - [`PoolStats`] / [`StatsSnapshot`] - Rent/return accounting

mod shared;
mod stats;

pub use shared::SharedPool;
pub use stats::{PoolStats, StatsSnapshot};

/// A source of fixed-size page buffers.
///
/// Implementations must support concurrent `rent`/`recycle` across stream
/// instances; this is the only shared mutable resource in the crate.
///
/// # Contract
/// - `rent(len)` returns a buffer of exactly `len` bytes, all zero.
/// - `recycle(buf)` accepts any buffer previously handed out by `rent`;
///   the pool may retain it for reuse or drop it.
pub trait PagePool: Send + Sync {
    /// Obtain a zero-filled buffer of exactly `len` bytes.
    fn rent(&self, len: usize) -> Vec<u8>;

    /// Return a previously rented buffer to the pool.
    fn recycle(&self, buf: Vec<u8>);
}
