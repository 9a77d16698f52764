//! The copy-on-write stream facade.
//!
//! [`CowStream`] composes the page table, the page layout, and an injected
//! buffer pool into a seekable read/write stream over a borrowed backing
//! source.

mod cow_stream;

pub use cow_stream::CowStream;
