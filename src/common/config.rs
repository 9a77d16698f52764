//! Configuration constants for cowstream.

/// Default size of a page in bytes (4KB).
///
/// This value is chosen to match:
/// - OS page size on most systems (4096 bytes)
/// - Common database/stream buffer sizes
///
/// Unlike a disk pager, the page size here is *not* required to be a power
/// of two: it is only the unit of lazy materialization, and every stream may
/// pick its own value at construction. This constant is just the default.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Maximum number of buffers the shared pool retains per buffer size.
///
/// Returns beyond this cap are simply dropped. 64 retained 4KB buffers is
/// 256KB of idle memory per size class, a reasonable ceiling for a
/// process-wide pool shared across many streams.
pub const DEFAULT_MAX_POOLED: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_size() {
        assert!(DEFAULT_PAGE_SIZE > 0);
        assert_eq!(DEFAULT_PAGE_SIZE, 4096);
    }

    #[test]
    fn test_default_max_pooled() {
        assert!(DEFAULT_MAX_POOLED > 0);
    }
}
