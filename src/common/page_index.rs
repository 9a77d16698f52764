//! Page index type.

use std::fmt;

/// Identifies a page slot in the page table.
///
/// Using `usize` because:
/// 1. Slots are stored in `Vec<PageSlot>`
/// 2. Direct indexing without casting: `slots[index.0]`
/// 3. Matches Rust idioms for array/vector indexing
///
/// # Example
/// ```
/// use cowstream::PageIndex;
///
/// let index = PageIndex::new(5);
/// // Can use directly as index: slots[index.0]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageIndex(pub usize);

impl PageIndex {
    /// Create a new PageIndex.
    #[inline]
    pub fn new(index: usize) -> Self {
        PageIndex(index)
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_index_new() {
        let index = PageIndex::new(10);
        assert_eq!(index.0, 10);
    }

    #[test]
    fn test_page_index_ordering() {
        assert_eq!(PageIndex::new(5), PageIndex::new(5));
        assert!(PageIndex::new(5) < PageIndex::new(6));
    }

    #[test]
    fn test_page_index_display() {
        assert_eq!(format!("{}", PageIndex::new(42)), "Page(42)");
    }
}
