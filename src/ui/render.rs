//! Renderer configuration shared by the grid and detail views.

use crate::config::Config;
use crate::content::{ContentPipeline, SanitizeMode};
use crate::filter::DEFAULT_RELATED_LIMIT;
use crate::util::{DEFAULT_EXCERPT_LENGTH, DEFAULT_MAX_DECODE_PASSES, DEFAULT_WORDS_PER_MINUTE};

/// Label shown for posts without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Joins the date and reading time on cards.
pub(super) const META_SEPARATOR: &str = " · ";

/// Knobs for building card and detail markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub excerpt_length: usize,
    pub words_per_minute: usize,
    pub max_decode_passes: usize,
    pub related_limit: usize,
    /// Stand-alone detail page that deep links point to.
    pub detail_page: String,
    /// Debug escape hatch: insert post bodies without sanitizing.
    pub unsafe_raw_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            max_decode_passes: DEFAULT_MAX_DECODE_PASSES,
            related_limit: DEFAULT_RELATED_LIMIT,
            detail_page: "insight.html".to_string(),
            unsafe_raw_html: false,
        }
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            excerpt_length: config.excerpt_length,
            words_per_minute: config.words_per_minute,
            max_decode_passes: config.max_decode_passes,
            related_limit: config.related_limit,
            detail_page: config.detail_page.clone(),
            unsafe_raw_html: config.unsafe_raw_html,
        }
    }
}

/// Builds the markup for cards, filter controls and the detail view.
///
/// The sanitize decision is fixed at construction; there is no way to flip
/// it on a live renderer.
pub struct Renderer {
    pub(super) options: RenderOptions,
    pub(super) pipeline: ContentPipeline,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        let mode = if options.unsafe_raw_html {
            SanitizeMode::Disabled
        } else {
            SanitizeMode::Sanitize
        };
        let pipeline = ContentPipeline::new(options.max_decode_passes, mode);
        Self { options, pipeline }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn sanitize_mode(&self) -> SanitizeMode {
        self.pipeline.mode()
    }
}
