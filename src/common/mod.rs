//! Common types and utilities shared across cowstream.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants
//! - Error types
//! - The page index newtype

pub mod config;
pub mod error;
mod page_index;

pub use error::{Error, Result};
pub use page_index::PageIndex;
