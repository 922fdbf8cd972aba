//! Card grid markup.

use std::fmt::Write as _;

use super::render::{Renderer, META_SEPARATOR, UNCATEGORIZED_LABEL};
use crate::source::Post;
use crate::util::{decode_entities, escape_html, estimate_reading_time, excerpt, format_date};

/// Shown in place of the grid when no post passes the filters.
pub const EMPTY_GRID_PLACEHOLDER: &str =
    "<p class=\"insights-empty\">No insights match your filters yet.</p>";

impl Renderer {
    /// Renders one card per post, in the given order.
    pub fn render_grid(&self, posts: &[&Post]) -> String {
        if posts.is_empty() {
            return EMPTY_GRID_PLACEHOLDER.to_string();
        }

        let mut html = String::with_capacity(posts.len() * 768);
        for post in posts {
            html.push_str(&self.render_card(post));
        }
        html
    }

    /// Renders a single card: category badge, title, date and reading time,
    /// tags, excerpt and the open control.
    pub fn render_card(&self, post: &Post) -> String {
        let slug = escape_html(&post.slug);
        let body = decode_entities(&post.content, self.options.max_decode_passes);

        let meta = [
            format_date(&post.published_at),
            estimate_reading_time(&body, self.options.words_per_minute),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(META_SEPARATOR);

        let mut html = String::with_capacity(768);
        let _ = write!(
            html,
            "<article class=\"insight-card\" data-slug=\"{slug}\" tabindex=\"0\">\
             <span class=\"insight-card__category\">{}</span>\
             <h3 class=\"insight-card__title\">{}</h3>",
            escape_html(post.category().unwrap_or(UNCATEGORIZED_LABEL)),
            escape_html(&post.title),
        );

        if !meta.is_empty() {
            let _ = write!(html, "<p class=\"insight-card__meta\">{}</p>", escape_html(&meta));
        }

        if !post.tags().is_empty() {
            html.push_str("<ul class=\"insight-card__tags\">");
            for tag in post.tags() {
                let _ = write!(html, "<li>#{}</li>", escape_html(tag));
            }
            html.push_str("</ul>");
        }

        let _ = write!(
            html,
            "<p class=\"insight-card__excerpt\">{}</p>\
             <button type=\"button\" class=\"insight-card__open\" data-slug=\"{slug}\">Read insight</button>\
             </article>",
            escape_html(&excerpt(&body, self.options.excerpt_length)),
        );

        html
    }
}
