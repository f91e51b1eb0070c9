//! Recording catalog for memovox
//!
//! Discovers memos on disk and formats their metadata for display.

mod entry;
mod scanner;

pub use entry::{format_duration_ms, format_size, CatalogEntry};
pub use scanner::scan;
