//! Page table and page addressing.
//!
//! # Components
//! - [`PageLayout`] - Pure offset arithmetic: absolute byte offsets to
//!   (page index, in-page offset), and byte ranges to per-page segments
//! - [`PageTable`] - Ordered page slots, each empty or materialized
//! - [`ReadView`] - What a reader finds at a given page

mod layout;
mod page_table;

pub use layout::{PageLayout, PageSegment, Segments};
pub use page_table::{PageTable, ReadView};
