//! Category and tag control bars.
//!
//! Controls are plain buttons carrying `data-category` / `data-tag`; the
//! permanent "All" control carries `data-category-all` instead, so it can
//! never be confused with a category of the same name. The
//! active one gets `is-active` and `aria-pressed="true"`.

use std::fmt::Write as _;

use crate::filter::CategoryFilter;
use crate::util::escape_html;

/// Renders the permanent "All" control followed by one control per category.
pub fn render_category_controls(categories: &[String], active: &CategoryFilter) -> String {
    let mut html = String::with_capacity(64 * (categories.len() + 1));
    let _ = write!(
        html,
        "<button type=\"button\" class=\"filter-chip{}\" data-category-all aria-pressed=\"{}\">All</button>",
        if active.is_all() { " is-active" } else { "" },
        active.is_all(),
    );

    for category in categories {
        let is_active = match active {
            CategoryFilter::All => false,
            CategoryFilter::Named(name) => name.to_lowercase() == category.to_lowercase(),
        };
        push_control(&mut html, "category", category, category, is_active);
    }
    html
}

/// Renders one `#tag` control per tag.
pub fn render_tag_controls(tags: &[String], active: Option<&str>) -> String {
    let active = active.map(str::to_lowercase);
    let mut html = String::with_capacity(64 * tags.len());

    for tag in tags {
        let is_active = active.as_deref() == Some(tag.to_lowercase().as_str());
        push_control(&mut html, "tag", tag, &format!("#{tag}"), is_active);
    }
    html
}

fn push_control(html: &mut String, kind: &str, value: &str, label: &str, active: bool) {
    let _ = write!(
        html,
        "<button type=\"button\" class=\"filter-chip{}\" data-{kind}=\"{}\" aria-pressed=\"{active}\">{}</button>",
        if active { " is-active" } else { "" },
        escape_html(value),
        escape_html(label),
    );
}
