use ammonia::Builder as HtmlSanitizer;

use super::markdown::render_markdown;
use crate::util::{contains_escaped_markup, decode_entities, looks_like_html, DEFAULT_MAX_DECODE_PASSES};

/// Whether rendered post bodies go through the HTML sanitizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SanitizeMode {
    #[default]
    Sanitize,
    /// Local diagnosis only: inserts content exactly as converted.
    Disabled,
}

/// How the stored body was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Html,
    Markdown,
}

/// Non-fatal problems noticed while preparing a post body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentAnomaly {
    /// Escaped `&lt;`/`&gt;` survived every decoding pass.
    EscapedMarkupRemains,
    /// The body was inserted without sanitizing.
    Unsanitized,
}

/// A post body ready for insertion into the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    pub html: String,
    pub format: ContentFormat,
    pub anomalies: Vec<ContentAnomaly>,
}

/// Decode, convert and sanitize a stored post body.
///
/// 1. Entity escaping is reversed (bounded number of passes).
/// 2. Bodies without any HTML tag are treated as Markdown.
/// 3. The HTML is cleaned with `ammonia` unless sanitizing is disabled.
///
/// Every anomaly is logged here and also returned to the caller.
pub struct ContentPipeline {
    max_decode_passes: usize,
    mode: SanitizeMode,
    sanitizer: HtmlSanitizer<'static>,
}

impl Default for ContentPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DECODE_PASSES, SanitizeMode::Sanitize)
    }
}

impl ContentPipeline {
    pub fn new(max_decode_passes: usize, mode: SanitizeMode) -> Self {
        if mode == SanitizeMode::Disabled {
            tracing::warn!("HTML sanitizing disabled; post content will be inserted unsanitized");
        }
        Self {
            max_decode_passes,
            mode,
            sanitizer: HtmlSanitizer::default(),
        }
    }

    pub fn mode(&self) -> SanitizeMode {
        self.mode
    }

    /// Prepares the body of the post identified by `slug`.
    pub fn process(&self, slug: &str, raw: &str) -> RenderedContent {
        let mut anomalies = Vec::new();

        let decoded = decode_entities(raw, self.max_decode_passes);
        if contains_escaped_markup(&decoded) {
            tracing::warn!(
                slug = %slug,
                passes = self.max_decode_passes,
                "Escaped markup remains after decoding post content"
            );
            anomalies.push(ContentAnomaly::EscapedMarkupRemains);
        }

        let (html, format) = if looks_like_html(&decoded) {
            (decoded, ContentFormat::Html)
        } else {
            (render_markdown(&decoded), ContentFormat::Markdown)
        };

        let html = match self.mode {
            SanitizeMode::Sanitize => self.sanitizer.clean(&html).to_string(),
            SanitizeMode::Disabled => {
                tracing::warn!(slug = %slug, "Inserting unsanitized post content");
                anomalies.push(ContentAnomaly::Unsanitized);
                html
            }
        };

        tracing::debug!(slug = %slug, format = ?format, bytes = html.len(), "Prepared post content");

        RenderedContent {
            html,
            format,
            anomalies,
        }
    }
}
