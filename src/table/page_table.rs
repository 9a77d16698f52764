//! The page table: per-page copy-on-write bookkeeping.

use tracing::trace;

use crate::common::PageIndex;
use crate::pool::PagePool;
use crate::table::PageLayout;

/// One slot of the page table.
#[derive(Debug)]
enum PageSlot {
    /// Content is still defined by the backing source (or is zero, past
    /// the source's original length).
    Empty,
    /// A privately owned, pooled buffer of exactly `page_size` bytes.
    Materialized(Vec<u8>),
}

/// What a reader finds at a page.
#[derive(Debug)]
pub enum ReadView<'a> {
    /// The page is materialized; read from this buffer.
    Page(&'a [u8]),
    /// The page is empty; read the backing source at the page's absolute
    /// offset instead.
    Backing,
}

/// An ordered sequence of page slots covering the stream's address space.
///
/// The table grows monotonically: [`ensure_capacity_for`] appends empty
/// slots and nothing ever removes one, matching the stream's append-only
/// length. Slots flip from empty to materialized exactly once, when the
/// facade first writes into the page.
///
/// [`ensure_capacity_for`]: PageTable::ensure_capacity_for
#[derive(Debug)]
pub struct PageTable {
    layout: PageLayout,
    slots: Vec<PageSlot>,
}

impl PageTable {
    /// Create a table covering `original_len` bytes, all slots empty.
    pub fn new(layout: PageLayout, original_len: u64) -> Self {
        let count = layout.pages_for(original_len);
        let mut slots = Vec::with_capacity(count);
        slots.resize_with(count, || PageSlot::Empty);
        Self { layout, slots }
    }

    /// The layout this table was built over.
    #[inline]
    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    /// Number of slots in the table.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of materialized slots.
    pub fn materialized_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, PageSlot::Materialized(_)))
            .count()
    }

    /// Whether the slot at `index` holds a materialized buffer.
    #[inline]
    pub fn is_materialized(&self, index: PageIndex) -> bool {
        matches!(self.slots[index.0], PageSlot::Materialized(_))
    }

    /// Append empty slots until the table covers `required_len` bytes.
    ///
    /// Never removes slots; a requirement the table already covers is a
    /// no-op.
    pub fn ensure_capacity_for(&mut self, required_len: u64) {
        let required = self.layout.pages_for(required_len);
        if required > self.slots.len() {
            trace!(
                "growing page table from {} to {} pages",
                self.slots.len(),
                required
            );
            self.slots.resize_with(required, || PageSlot::Empty);
        }
    }

    /// How a reader should obtain the bytes of page `index`.
    pub fn read_view(&self, index: PageIndex) -> ReadView<'_> {
        match &self.slots[index.0] {
            PageSlot::Materialized(buf) => ReadView::Page(buf),
            PageSlot::Empty => ReadView::Backing,
        }
    }

    /// Install a freshly filled buffer into an empty slot.
    ///
    /// The caller performs the copy-on-write fill (backing-source prefix,
    /// zeros beyond it) before installing.
    ///
    /// # Panics
    /// Panics if the slot is already materialized; materialization happens
    /// exactly once per page.
    pub fn install(&mut self, index: PageIndex, buf: Vec<u8>) -> &mut [u8] {
        let slot = &mut self.slots[index.0];
        assert!(
            matches!(slot, PageSlot::Empty),
            "{} is already materialized",
            index
        );
        *slot = PageSlot::Materialized(buf);
        match slot {
            PageSlot::Materialized(buf) => buf,
            PageSlot::Empty => unreachable!(),
        }
    }

    /// The materialized buffer of page `index`.
    ///
    /// # Panics
    /// Panics if the slot is empty; callers materialize first.
    pub fn writable_buffer(&mut self, index: PageIndex) -> &mut [u8] {
        match &mut self.slots[index.0] {
            PageSlot::Materialized(buf) => buf,
            PageSlot::Empty => panic!("{} is not materialized", index),
        }
    }

    /// Recycle every materialized buffer into `pool` and clear the table.
    ///
    /// Returns the number of buffers recycled. Safe on an empty table, and
    /// idempotent: a second call finds nothing to recycle.
    pub fn release_all(&mut self, pool: &dyn PagePool) -> usize {
        let mut recycled = 0;
        for slot in self.slots.drain(..) {
            if let PageSlot::Materialized(buf) = slot {
                pool.recycle(buf);
                recycled += 1;
            }
        }
        recycled
    }
}
