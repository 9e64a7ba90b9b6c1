//! Utility functions for slugs and display formatting.

pub mod format;
pub mod slug;

// Re-export commonly used functions at module level
pub use format::{format_date, format_optional, truncate_string};
pub use slug::{generate_slug, slugify};
