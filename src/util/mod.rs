//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **Text processing**: HTML-to-text extraction, excerpts, escaping,
//!   entity decoding, reading-time and date formatting
//! - **URLs**: data source URL validation and detail-page links
//!
//! # Examples
//!
//! ```
//! use insights::util::{escape_html, excerpt, format_date};
//!
//! let preview = excerpt("<p>Long article body</p>", 4);
//! assert_eq!(preview, "Long…");
//!
//! assert_eq!(escape_html("<b>"), "&lt;b&gt;");
//! assert_eq!(format_date("2024-10-03"), "Oct 3, 2024");
//! ```

mod text;
mod urls;

pub use text::{
    contains_escaped_markup, decode_entities, escape_html, estimate_reading_time, excerpt,
    format_date, looks_like_html, plain_text, DEFAULT_EXCERPT_LENGTH, DEFAULT_MAX_DECODE_PASSES,
    DEFAULT_WORDS_PER_MINUTE,
};
pub use urls::{detail_href, validate_source_url, UrlValidationError};

/// Maximum accepted search query length; longer input is truncated.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
