//! cowstream - A paged, copy-on-write overlay over a borrowed byte source.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           cowstream                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Stream Facade (stream/)                     │   │
//! │  │     CowStream: Read / Write / Seek orchestration          │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Page Table + Addressing (table/)               │   │
//! │  │   PageLayout (offset → page math)  PageTable (CoW slots)  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                ↓                              ↓                 │
//! │  ┌──────────────────────────┐  ┌──────────────────────────┐   │
//! │  │   Buffer Pool (pool/)    │  │   Backing Source (&mut S) │   │
//! │  │  PagePool + SharedPool   │  │   borrowed, never closed  │   │
//! │  └──────────────────────────┘  └──────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stream starts as a pure view of the backing source. The first write
//! touching a page rents a buffer from the pool, copies the page's
//! source-backed prefix into it, and from then on that page lives in
//! memory; pages never written keep reading through to the source. Writes
//! past the end extend the logical length (the stream never shrinks), and
//! dropping the stream returns every rented buffer to the pool without
//! touching the source.
//!
//! # Modules
//! - [`common`] - Shared primitives (PageIndex, Error, config)
//! - [`pool`] - Page buffer pooling (PagePool, SharedPool, stats)
//! - [`table`] - Page addressing arithmetic and the page table
//! - [`stream`] - The CowStream facade
//!
//! # Quick Start
//! ```
//! use std::io::{Cursor, Read, Seek, SeekFrom, Write};
//! use cowstream::CowStream;
//!
//! let mut source = Cursor::new(b"hello world".to_vec());
//! let mut stream = CowStream::new(&mut source).unwrap();
//!
//! // Overwrite in place; the source is never modified.
//! stream.write_all(b"HELLO").unwrap();
//!
//! let mut out = String::new();
//! stream.seek(SeekFrom::Start(0)).unwrap();
//! stream.read_to_string(&mut out).unwrap();
//! assert_eq!(out, "HELLO world");
//! ```

// Core modules
pub mod common;
pub mod pool;
pub mod stream;
pub mod table;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_MAX_POOLED, DEFAULT_PAGE_SIZE};
pub use common::{Error, PageIndex, Result};

pub use pool::{PagePool, PoolStats, SharedPool, StatsSnapshot};
pub use stream::CowStream;
pub use table::{PageLayout, PageSegment, PageTable, ReadView};
