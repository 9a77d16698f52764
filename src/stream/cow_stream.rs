//! The copy-on-write stream over a borrowed backing source.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::common::config::DEFAULT_PAGE_SIZE;
use crate::common::{Error, PageIndex, Result};
use crate::pool::{PagePool, SharedPool};
use crate::table::{PageLayout, PageTable, ReadView};

/// A paged, copy-on-write overlay presenting a read/write stream over a
/// read-only view of a borrowed byte source.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │                     CowStream<'s, S>                      │
/// │  position ──┐                                             │
/// │  length ────┤   ┌───────────────────────────────────┐    │
/// │             └──▶│  PageTable: [Mat] [Empty] [Mat] …  │    │
/// │                 └──────┬──────────┬─────────────────┘    │
/// │            materialized│          │empty                 │
/// │                 ┌──────▼────┐  ┌──▼──────────────┐       │
/// │                 │ PagePool  │  │ &'s mut S        │       │
/// │                 │ (rented)  │  │ (backing source) │       │
/// │                 └───────────┘  └─────────────────┘       │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// Reads pull empty pages from the backing source and materialized pages
/// from their pooled buffers. Writes materialize every page they touch
/// (copying the source-backed prefix first) and may extend the logical
/// length past the source's original length; the length never shrinks.
/// The source is *borrowed*: the overlay seeks and reads it freely while
/// alive, but never closes it, and dropping the overlay only returns page
/// buffers to the pool.
///
/// # Thread Safety
/// Every operation takes `&mut self`, so concurrent use of one stream is
/// rejected at compile time. Only the injected pool is shared state.
///
/// # Usage
/// ```
/// use std::io::{Cursor, Read, Seek, SeekFrom, Write};
/// use cowstream::CowStream;
///
/// let mut source = Cursor::new(vec![1u8, 2, 3, 4]);
/// let mut stream = CowStream::with_page_size(&mut source, 2).unwrap();
///
/// stream.write_all(&[9]).unwrap();          // overwrite byte 0
/// stream.seek(SeekFrom::End(0)).unwrap();
/// stream.write_all(&[5, 6]).unwrap();        // append past the source
///
/// let mut all = Vec::new();
/// stream.seek(SeekFrom::Start(0)).unwrap();
/// stream.read_to_end(&mut all).unwrap();
/// assert_eq!(all, [9, 2, 3, 4, 5, 6]);
///
/// drop(stream);
/// assert_eq!(source.into_inner(), [1, 2, 3, 4]); // source untouched
/// ```
pub struct CowStream<'s, S> {
    /// The backing source, borrowed for the stream's lifetime.
    source: &'s mut S,

    /// Page slots; empty slots defer to the source, materialized slots own
    /// pooled buffers. Also carries the offset arithmetic ([`PageLayout`]).
    table: PageTable,

    /// Where materialized page buffers are rented from and returned to.
    pool: Arc<dyn PagePool>,

    /// Current stream position; always within `[0, length]`.
    position: u64,

    /// Logical length; starts at `original_len` and only grows.
    length: u64,

    /// The backing source's length at construction.
    original_len: u64,
}

impl<'s, S: Read + Seek> CowStream<'s, S> {
    /// Create a stream with the default page size and a private pool.
    pub fn new(source: &'s mut S) -> Result<Self> {
        Self::with_pool(source, DEFAULT_PAGE_SIZE, Arc::new(SharedPool::new()))
    }

    /// Create a stream over pages of `page_size` bytes with a private pool.
    pub fn with_page_size(source: &'s mut S, page_size: usize) -> Result<Self> {
        Self::with_pool(source, page_size, Arc::new(SharedPool::new()))
    }

    /// Create a stream with an injected page buffer pool.
    ///
    /// This is how one pool is shared across streams, and how tests
    /// substitute an instrumented pool.
    ///
    /// # Errors
    /// - `Error::InvalidPageSize` if `page_size` is 0
    /// - `Error::Io` if probing the source's length fails
    pub fn with_pool(
        source: &'s mut S,
        page_size: usize,
        pool: Arc<dyn PagePool>,
    ) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize);
        }
        let original_len = source.seek(SeekFrom::End(0))?;
        let layout = PageLayout::new(page_size);

        debug!(
            "cow stream over {} source bytes, page size {}",
            original_len, page_size
        );

        Ok(Self {
            source,
            table: PageTable::new(layout, original_len),
            pool,
            position: 0,
            length: original_len,
            original_len,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current position in the stream.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Move to `position`, validated like a seek.
    ///
    /// # Errors
    /// `Error::SeekPastEnd` if `position` exceeds [`len`](Self::len);
    /// the position is unchanged on failure.
    pub fn set_position(&mut self, position: u64) -> Result<()> {
        if position > self.length {
            return Err(Error::SeekPastEnd {
                target: position,
                len: self.length,
            });
        }
        self.position = position;
        Ok(())
    }

    /// Logical length of the stream in bytes.
    #[inline]
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Whether the stream has length 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Length of the backing source when the stream was constructed.
    #[inline]
    pub fn original_len(&self) -> u64 {
        self.original_len
    }

    /// The page size this stream was constructed with.
    #[inline]
    pub fn page_size(&self) -> usize {
        self.table.layout().page_size()
    }

    /// Number of pages materialized so far.
    pub fn materialized_pages(&self) -> usize {
        self.table.materialized_count()
    }

    /// Explicit resize is unsupported; the stream only grows via appends.
    ///
    /// # Errors
    /// Always `Error::SetLenUnsupported`. The method exists so the
    /// capability restriction is explicit and testable rather than a
    /// silent absence.
    pub fn set_len(&mut self, _len: u64) -> Result<()> {
        Err(Error::SetLenUnsupported)
    }

    // ========================================================================
    // Materialization
    // ========================================================================

    /// Make page `index` materialized, renting and filling a buffer on
    /// first access.
    ///
    /// The buffer's source-backed prefix (the page's overlap with
    /// `[0, original_len)`) is copied from the source before any caller
    /// bytes land in it; the rest stays zero from the pool.
    fn materialize(&mut self, index: PageIndex) -> Result<()> {
        if self.table.is_materialized(index) {
            return Ok(());
        }

        let mut buf = self.pool.rent(self.table.layout().page_size());
        let page_start = self.table.layout().page_start(index);
        if page_start < self.original_len {
            let prefix = ((self.original_len - page_start) as usize).min(buf.len());
            if let Err(e) = read_exact_at(&mut *self.source, page_start, &mut buf[..prefix]) {
                // The rent/return balance stays exact even when the fill
                // fails.
                self.pool.recycle(buf);
                return Err(e.into());
            }
        }

        trace!("materialized {}", index);
        self.table.install(index, buf);
        Ok(())
    }
}

impl<'s, S: Read + Seek + Write> CowStream<'s, S> {
    /// Forward a flush to the backing source.
    ///
    /// The stream itself buffers nothing beyond its materialized pages, so
    /// [`Write::flush`] on the stream is a no-op; this method exists for
    /// sources that are themselves write-buffered.
    pub fn flush_source(&mut self) -> io::Result<()> {
        self.source.flush()
    }
}

impl<S: Read + Seek> Read for CowStream<'_, S> {
    /// Read from the overlay at the current position.
    ///
    /// Materialized pages are copied from their buffers; empty pages are
    /// read from the backing source at the page's absolute offset. Returns
    /// `Ok(0)` at end of stream or for an empty destination, without
    /// moving the position. A short read from the source is reflected in
    /// the return value; if the source fails after some bytes were copied,
    /// those bytes are committed and the failure resurfaces on the next
    /// call.
    fn read(&mut self, dest: &mut [u8]) -> io::Result<usize> {
        if dest.is_empty() || self.position >= self.length {
            return Ok(0);
        }
        let end = self
            .position
            .saturating_add(dest.len() as u64)
            .min(self.length);

        let mut copied = 0usize;
        for seg in self.table.layout().segments(self.position..end) {
            let out = &mut dest[copied..copied + seg.len];
            let n = match self.table.read_view(seg.page) {
                ReadView::Page(page) => {
                    out.copy_from_slice(&page[seg.in_page()]);
                    seg.len
                }
                ReadView::Backing => {
                    let abs = self.table.layout().page_start(seg.page) + seg.start as u64;
                    match fill_from_backing(&mut *self.source, self.original_len, abs, out) {
                        Ok(n) => n,
                        Err(e) if copied == 0 => return Err(e),
                        Err(_) => break,
                    }
                }
            };
            copied += n;
            self.position += n as u64;
            if n < seg.len {
                break;
            }
        }
        Ok(copied)
    }
}

impl<S: Read + Seek> Write for CowStream<'_, S> {
    /// Write at the current position, materializing every touched page.
    ///
    /// Writing past the current length unconditionally extends it — this
    /// implicit extension is the defining append behavior; no explicit
    /// resize call exists. An empty write is a no-op at any position. On
    /// an error mid-walk the position and length are unchanged.
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if data.is_empty() {
            return Ok(0);
        }
        let end = self
            .position
            .checked_add(data.len() as u64)
            .ok_or(Error::LengthOverflow)?;
        self.table.ensure_capacity_for(end);

        let mut copied = 0usize;
        for seg in self.table.layout().segments(self.position..end) {
            self.materialize(seg.page)?;
            let page = self.table.writable_buffer(seg.page);
            page[seg.in_page()].copy_from_slice(&data[copied..copied + seg.len]);
            copied += seg.len;
        }

        self.position = end;
        if end > self.length {
            self.length = end;
        }
        Ok(data.len())
    }

    /// No-op: committed bytes already live in materialized pages.
    ///
    /// See [`flush_source`](Self::flush_source) for forwarding a flush to
    /// a write-capable source.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Read + Seek> Seek for CowStream<'_, S> {
    /// Reposition the stream within `[0, len()]`.
    ///
    /// `SeekFrom::End` is relative to the logical length, not the source's
    /// original length. Seeking past end of stream fails and leaves the
    /// position unchanged — unlike raw file handles, there is no implicit
    /// hole creation here.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
            SeekFrom::End(delta) => self.length.checked_add_signed(delta),
        }
        .ok_or(Error::SeekOverflow)?;

        if target > self.length {
            return Err(Error::SeekPastEnd {
                target,
                len: self.length,
            }
            .into());
        }
        self.position = target;
        Ok(target)
    }
}

impl<S> Drop for CowStream<'_, S> {
    /// Return every materialized page buffer to the pool.
    ///
    /// The backing source is not touched: its lifecycle belongs to the
    /// caller that lent it.
    fn drop(&mut self) {
        let recycled = self.table.release_all(self.pool.as_ref());
        debug!("cow stream dropped, {} page buffers recycled", recycled);
    }
}

/// Seek to `offset` and fill `buf` completely.
fn read_exact_at<S: Read + Seek>(source: &mut S, offset: u64, buf: &mut [u8]) -> io::Result<()> {
    source.seek(SeekFrom::Start(offset))?;
    source.read_exact(buf)
}

/// Fill `out` for an empty page at absolute offset `abs`.
///
/// The span below `original_len` comes from one read against the source
/// (retrying `Interrupted`); any remainder at or past `original_len` is
/// zero. Returns the number of bytes filled, which is short only when the
/// source itself read short.
fn fill_from_backing<S: Read + Seek>(
    source: &mut S,
    original_len: u64,
    abs: u64,
    out: &mut [u8],
) -> io::Result<usize> {
    if abs >= original_len {
        out.iter_mut().for_each(|b| *b = 0);
        return Ok(out.len());
    }

    let from_source = ((original_len - abs) as usize).min(out.len());
    source.seek(SeekFrom::Start(abs))?;
    let n = loop {
        match source.read(&mut out[..from_source]) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => break other?,
        }
    };
    if n == from_source && from_source < out.len() {
        out[from_source..].iter_mut().for_each(|b| *b = 0);
        return Ok(out.len());
    }
    Ok(n)
}
