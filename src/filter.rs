//! Filtering and relevance scoring over the loaded posts.
//!
//! All comparisons of categories and tags are case-insensitive. The loaded
//! collection is small (a few hundred posts at most), so every call simply
//! scans it; nothing is cached between renders.

use std::collections::HashSet;

use crate::source::Post;
use crate::util::plain_text;

/// Default number of related posts shown under a detail view.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Weight of each shared tag in [`relevance_score`].
const SHARED_TAG_WEIGHT: usize = 2;
/// Bonus for a matching category in [`relevance_score`].
const SAME_CATEGORY_BONUS: usize = 1;

/// The category half of a filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Parses a category control value. Only a blank value selects
    /// everything; a category that happens to be called "All" stays named.
    pub fn from_value(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value.to_string())
        }
    }

    /// The control value for this filter; empty for [`CategoryFilter::All`].
    pub fn as_value(&self) -> &str {
        match self {
            CategoryFilter::All => "",
            CategoryFilter::Named(name) => name,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }
}

/// The three active selections that decide which posts are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub category: CategoryFilter,
    pub tag: Option<String>,
    pub query: String,
}

impl FilterSelection {
    /// Selects a category and clears any tag selection.
    pub fn select_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.tag = None;
    }

    /// Selects `tag`, or clears it when it is already the selected tag.
    /// The category selection is left alone.
    pub fn toggle_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if self
            .tag
            .as_deref()
            .is_some_and(|current| normalize_tag(current) == normalize_tag(tag))
        {
            self.tag = None;
        } else {
            self.tag = Some(tag.to_string());
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Comparison form of a tag. Controls, selection, matching and scoring all
/// go through this, so a stored `" Rust"` and a `#rust` control agree.
fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// True when `post` satisfies all three selections.
pub fn passes_filters(post: &Post, selection: &FilterSelection) -> bool {
    matches_category(post, &selection.category)
        && matches_tag(post, selection.tag.as_deref())
        && matches_query(post, &selection.query)
}

fn matches_category(post: &Post, category: &CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Named(name) => post.category().is_some_and(|c| eq_ignore_case(c, name)),
    }
}

fn matches_tag(post: &Post, tag: Option<&str>) -> bool {
    match tag {
        None => true,
        Some(tag) => {
            let wanted = normalize_tag(tag);
            post.tags().iter().any(|t| normalize_tag(t) == wanted)
        }
    }
}

fn matches_query(post: &Post, query: &str) -> bool {
    // Blank queries pass; otherwise the query is matched as typed
    if query.trim().is_empty() {
        return true;
    }

    let haystack = format!("{} {}", post.title, plain_text(&post.content)).to_lowercase();
    haystack.contains(&query.to_lowercase())
}

/// The visible subset of `posts`, in collection order.
pub fn filter_posts<'a>(posts: &'a [Post], selection: &FilterSelection) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|post| passes_filters(post, selection))
        .collect()
}

/// Looks a post up by slug.
pub fn find_post<'a>(posts: &'a [Post], slug: &str) -> Option<&'a Post> {
    posts.iter().find(|post| post.slug == slug)
}

/// Scores how related `candidate` is to `target`: two points per shared tag
/// plus one for the same category.
pub fn relevance_score(target: &Post, candidate: &Post) -> usize {
    let target_tags = lowercase_tags(target);
    let shared = lowercase_tags(candidate).intersection(&target_tags).count();
    let same_category = match (target.category(), candidate.category()) {
        (Some(a), Some(b)) => eq_ignore_case(a, b),
        _ => false,
    };

    shared * SHARED_TAG_WEIGHT + usize::from(same_category) * SAME_CATEGORY_BONUS
}

fn lowercase_tags(post: &Post) -> HashSet<String> {
    post.tags()
        .iter()
        .map(|t| normalize_tag(t))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Picks up to `max` posts related to `target`.
///
/// Candidates with a positive [`relevance_score`] are returned best first;
/// equal scores keep collection order. When nothing scores, the first `max`
/// other posts are returned as they are, which with a newest-first collection
/// means the most recent ones.
pub fn related_posts<'a>(target: &Post, posts: &'a [Post], max: usize) -> Vec<&'a Post> {
    let candidates: Vec<&Post> = posts.iter().filter(|p| p.slug != target.slug).collect();

    let mut scored: Vec<(usize, &Post)> = candidates
        .iter()
        .map(|p| (relevance_score(target, p), *p))
        .filter(|(score, _)| *score > 0)
        .collect();

    if scored.is_empty() {
        return candidates.into_iter().take(max).collect();
    }

    // Stable: ties keep collection order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(max).map(|(_, post)| post).collect()
}

/// Distinct categories present in `posts`, sorted alphabetically.
pub fn distinct_categories(posts: &[Post]) -> Vec<String> {
    distinct_sorted(posts.iter().filter_map(Post::category))
}

/// Distinct tags present in `posts`, sorted alphabetically.
pub fn distinct_tags(posts: &[Post]) -> Vec<String> {
    distinct_sorted(
        posts
            .iter()
            .flat_map(|p| p.tags().iter().map(String::as_str))
            .map(str::trim)
            .filter(|t| !t.is_empty()),
    )
}

/// Dedupes case-insensitively (first spelling wins) and sorts by lowercase
/// form, then by spelling for a deterministic order.
fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = values
        .filter(|v| seen.insert(v.to_lowercase()))
        .map(str::to_string)
        .collect();
    out.sort_by_cached_key(|v| (v.to_lowercase(), v.clone()));
    out
}
