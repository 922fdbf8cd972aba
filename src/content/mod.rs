//! Post body preparation: entity decoding, Markdown conversion and HTML
//! sanitizing.
//!
//! - [`markdown`] - `pulldown-cmark` conversion
//! - [`pipeline`] - [`ContentPipeline`], the decode/convert/sanitize sequence

mod markdown;
mod pipeline;

pub use markdown::render_markdown;
pub use pipeline::{ContentAnomaly, ContentFormat, ContentPipeline, RenderedContent, SanitizeMode};
