//! Page addressing arithmetic.

use std::ops::Range;

use crate::common::PageIndex;

/// Maps absolute byte offsets onto fixed-size pages.
///
/// All methods are pure arithmetic; the layout holds no page data. An
/// offset exactly on a page boundary belongs to the page beginning there,
/// with in-page offset 0.
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    page_size: usize,
}

impl PageLayout {
    /// Create a layout over pages of `page_size` bytes.
    ///
    /// # Panics
    /// Panics if `page_size` is 0. Stream constructors validate the page
    /// size and return [`Error::InvalidPageSize`](crate::Error) before a
    /// layout is ever built from bad input.
    pub fn new(page_size: usize) -> Self {
        assert!(page_size > 0, "page_size must be > 0");
        Self { page_size }
    }

    /// The page size in bytes.
    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Map an absolute offset to (page index, offset within that page).
    #[inline]
    pub fn locate(&self, offset: u64) -> (PageIndex, usize) {
        let size = self.page_size as u64;
        (
            PageIndex::new((offset / size) as usize),
            (offset % size) as usize,
        )
    }

    /// Absolute offset of the first byte of a page.
    #[inline]
    pub fn page_start(&self, index: PageIndex) -> u64 {
        index.0 as u64 * self.page_size as u64
    }

    /// Minimum number of pages covering `len` bytes. 0 for an empty range.
    #[inline]
    pub fn pages_for(&self, len: u64) -> usize {
        len.div_ceil(self.page_size as u64) as usize
    }

    /// Decompose an absolute byte range into ordered per-page segments.
    ///
    /// Yields one [`PageSegment`] per covered page, ascending and gap-free;
    /// an empty range yields nothing. This is the single arithmetic kernel
    /// both the read and the write path iterate over.
    pub fn segments(&self, range: Range<u64>) -> Segments {
        Segments {
            page_size: self.page_size,
            next: range.start,
            end: range.end,
        }
    }
}

/// One page's share of an absolute byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSegment {
    /// The page this segment lies in.
    pub page: PageIndex,
    /// Offset of the segment's first byte within the page.
    pub start: usize,
    /// Segment length; `start + len <= page_size` always holds.
    pub len: usize,
}

impl PageSegment {
    /// The segment as an in-page range, for slicing a page buffer.
    #[inline]
    pub fn in_page(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Iterator over the per-page segments of a byte range.
///
/// Returned by [`PageLayout::segments`].
#[derive(Debug, Clone)]
pub struct Segments {
    page_size: usize,
    next: u64,
    end: u64,
}

impl Iterator for Segments {
    type Item = PageSegment;

    fn next(&mut self) -> Option<PageSegment> {
        if self.next >= self.end {
            return None;
        }
        let size = self.page_size as u64;
        let page = PageIndex::new((self.next / size) as usize);
        let start = (self.next % size) as usize;
        let len = ((size - start as u64).min(self.end - self.next)) as usize;
        self.next += len as u64;
        Some(PageSegment { page, start, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_boundaries() {
        let layout = PageLayout::new(8);
        assert_eq!(layout.locate(0), (PageIndex::new(0), 0));
        assert_eq!(layout.locate(7), (PageIndex::new(0), 7));
        // A boundary offset belongs to the page beginning there.
        assert_eq!(layout.locate(8), (PageIndex::new(1), 0));
        assert_eq!(layout.locate(17), (PageIndex::new(2), 1));
    }

    #[test]
    fn test_page_start_inverts_locate() {
        let layout = PageLayout::new(3);
        for offset in 0..30u64 {
            let (page, in_page) = layout.locate(offset);
            assert_eq!(layout.page_start(page) + in_page as u64, offset);
        }
    }

    #[test]
    fn test_pages_for() {
        let layout = PageLayout::new(4);
        assert_eq!(layout.pages_for(0), 0);
        assert_eq!(layout.pages_for(1), 1);
        assert_eq!(layout.pages_for(4), 1);
        assert_eq!(layout.pages_for(5), 2);
        assert_eq!(layout.pages_for(13), 4);
    }

    #[test]
    fn test_segments_empty_range() {
        let layout = PageLayout::new(8);
        assert_eq!(layout.segments(5..5).count(), 0);
        assert_eq!(layout.segments(0..0).count(), 0);
    }

    #[test]
    fn test_segments_within_one_page() {
        let layout = PageLayout::new(8);
        let segs: Vec<_> = layout.segments(2..6).collect();
        assert_eq!(
            segs,
            vec![PageSegment {
                page: PageIndex::new(0),
                start: 2,
                len: 4
            }]
        );
    }

    #[test]
    fn test_segments_span_pages() {
        let layout = PageLayout::new(4);
        let segs: Vec<_> = layout.segments(3..11).collect();
        assert_eq!(
            segs,
            vec![
                PageSegment {
                    page: PageIndex::new(0),
                    start: 3,
                    len: 1
                },
                PageSegment {
                    page: PageIndex::new(1),
                    start: 0,
                    len: 4
                },
                PageSegment {
                    page: PageIndex::new(2),
                    start: 0,
                    len: 3
                },
            ]
        );
    }

    #[test]
    fn test_segments_cover_range_exactly() {
        // Ascending, gap-free, never crossing a page boundary.
        for page_size in [1usize, 3, 4, 8] {
            let layout = PageLayout::new(page_size);
            let range = 5u64..47;
            let mut expected_next = range.start;
            let mut last_page = None;
            for seg in layout.segments(range.clone()) {
                assert_eq!(
                    layout.page_start(seg.page) + seg.start as u64,
                    expected_next
                );
                assert!(seg.len > 0);
                assert!(seg.start + seg.len <= page_size);
                if let Some(prev) = last_page {
                    assert!(seg.page > prev);
                }
                last_page = Some(seg.page);
                expected_next += seg.len as u64;
            }
            assert_eq!(expected_next, range.end);
        }
    }

    #[test]
    fn test_in_page_range() {
        let seg = PageSegment {
            page: PageIndex::new(1),
            start: 2,
            len: 5,
        };
        assert_eq!(seg.in_page(), 2..7);
    }

    #[test]
    #[should_panic(expected = "page_size must be > 0")]
    fn test_zero_page_size_panics() {
        PageLayout::new(0);
    }
}
