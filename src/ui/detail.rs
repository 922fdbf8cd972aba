//! Detail modal markup for a single post.

use std::fmt::Write as _;

use super::render::{Renderer, UNCATEGORIZED_LABEL};
use crate::content::ContentAnomaly;
use crate::filter::related_posts;
use crate::source::Post;
use crate::util::{detail_href, escape_html, estimate_reading_time, format_date};

/// Rendered detail view plus what the controller needs to wire it up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub html: String,
    /// Slugs of the related posts, in display order. Each entry in the
    /// markup carries `data-slug` so a click opens that post.
    pub related: Vec<String>,
    pub anomalies: Vec<ContentAnomaly>,
}

impl Renderer {
    /// Renders the full modal content for `post`.
    ///
    /// `posts` is the loaded collection the related section draws from.
    /// Content problems never abort the render; they are logged by the
    /// pipeline and reported in [`DetailView::anomalies`].
    pub fn render_detail(&self, post: &Post, posts: &[Post]) -> DetailView {
        let content = self.pipeline.process(&post.slug, &post.content);
        let related = related_posts(post, posts, self.options.related_limit);

        let mut html = String::with_capacity(content.html.len() + 2048);
        let _ = write!(
            html,
            "<article class=\"insight-detail\" data-slug=\"{}\"><header class=\"insight-detail__header\">\
             <span class=\"insight-detail__category\">{}</span>",
            escape_html(&post.slug),
            escape_html(post.category().unwrap_or(UNCATEGORIZED_LABEL)),
        );

        if !post.tags().is_empty() {
            html.push_str("<ul class=\"insight-detail__tags\">");
            for tag in post.tags() {
                let _ = write!(html, "<li>#{}</li>", escape_html(tag));
            }
            html.push_str("</ul>");
        }

        let _ = write!(
            html,
            "<h2 class=\"insight-detail__title\">{}</h2>",
            escape_html(&post.title)
        );

        let reading_time = estimate_reading_time(&content.html, self.options.words_per_minute);
        if !reading_time.is_empty() {
            let _ = write!(html, "<p class=\"insight-detail__meta\">{reading_time}</p>");
        }

        let _ = write!(
            html,
            "<a class=\"insight-detail__link\" href=\"{}\">Open as page</a></header>\
             <div class=\"insight-detail__content\">{}</div>",
            escape_html(&detail_href(&self.options.detail_page, &post.slug)),
            content.html,
        );

        html.push_str(&render_footer(post));
        html.push_str(&self.render_related(&related));
        html.push_str("</article>");

        DetailView {
            html,
            related: related.iter().map(|p| p.slug.clone()).collect(),
            anomalies: content.anomalies,
        }
    }

    fn render_related(&self, related: &[&Post]) -> String {
        if related.is_empty() {
            return String::new();
        }

        let mut html = String::from(
            "<section class=\"insight-detail__related\"><h3>Related insights</h3><ul>",
        );
        for post in related {
            let slug = &post.slug;
            let _ = write!(
                html,
                "<li><button type=\"button\" class=\"related-post\" data-slug=\"{}\">{}</button>\
                 <a class=\"related-post__link\" href=\"{}\">Open as page</a></li>",
                escape_html(slug),
                escape_html(&post.title),
                escape_html(&detail_href(&self.options.detail_page, slug)),
            );
        }
        html.push_str("</ul></section>");
        html
    }
}

fn render_footer(post: &Post) -> String {
    let author = post
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());
    let date = format_date(&post.published_at);

    if author.is_none() && date.is_empty() {
        return String::new();
    }

    let mut html = String::from("<footer class=\"insight-detail__footer\">");
    if let Some(author) = author {
        let _ = write!(
            html,
            "<span class=\"insight-detail__author\">By {}</span>",
            escape_html(author)
        );
    }
    if !date.is_empty() {
        let _ = write!(
            html,
            "<span class=\"insight-detail__date\">{}</span>",
            escape_html(&date)
        );
    }
    html.push_str("</footer>");
    html
}
