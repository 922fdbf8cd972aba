use reqwest::redirect::Policy;
use thiserror::Error;

use crate::filter::{
    distinct_categories, distinct_tags, filter_posts, find_post, CategoryFilter, FilterSelection,
};
use crate::source::{Post, PostSource, SourceError};
use crate::ui::{render_category_controls, render_tag_controls, Page, Renderer};
use crate::util::MAX_SEARCH_QUERY_LENGTH;

// ============================================================================
// Load Errors
// ============================================================================

/// Shown when the data source reported a failure.
const FETCH_ERROR_MESSAGE: &str = "We couldn't load insights right now. Please try again later.";
/// Shown for any other failure during the load.
const UNEXPECTED_ERROR_MESSAGE: &str =
    "Something went wrong while loading insights. Please refresh the page.";

/// Which class of failure ended a load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The data source explicitly reported an error.
    Fetch,
    /// Network failure, timeout, malformed response and the like.
    Unexpected,
}

impl FailureKind {
    /// Stable user-facing message for this failure class.
    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::Fetch => FETCH_ERROR_MESSAGE,
            FailureKind::Unexpected => UNEXPECTED_ERROR_MESSAGE,
        }
    }
}

/// A failed load attempt.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Data source reported an error: {0}")]
    Fetch(#[source] SourceError),
    #[error("Unexpected failure while loading posts: {0}")]
    Unexpected(#[source] SourceError),
}

impl From<SourceError> for LoadError {
    fn from(err: SourceError) -> Self {
        if err.is_service_error() {
            LoadError::Fetch(err)
        } else {
            LoadError::Unexpected(err)
        }
    }
}

impl LoadError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LoadError::Fetch(_) => FailureKind::Fetch,
            LoadError::Unexpected(_) => FailureKind::Unexpected,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

// ============================================================================
// View State
// ============================================================================

/// Loaded posts plus the active filter selections.
///
/// The visible set is always recomputed from this; nothing filtered is kept.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Newest first, as delivered by the data source.
    pub posts: Vec<Post>,
    pub selection: FilterSelection,
}

impl ViewState {
    pub fn visible_posts(&self) -> Vec<&Post> {
        filter_posts(&self.posts, &self.selection)
    }
}

/// Progress of the single load per page lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready {
        count: usize,
    },
    Failed {
        kind: FailureKind,
        detail: String,
    },
}

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Create a redirect policy with loop detection and limited hops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// HTTP client used for the data source.
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .user_agent(concat!("insights/", env!("CARGO_PKG_VERSION")))
        .build()
}

// ============================================================================
// Controller
// ============================================================================

/// Owns the view state, the renderer and the page, and keeps the page in
/// sync with the state after every change.
pub struct App<P: Page> {
    state: ViewState,
    load_state: LoadState,
    renderer: Renderer,
    page: P,
    /// Slug of the post shown in the modal.
    open_slug: Option<String>,
}

impl<P: Page> App<P> {
    pub fn new(page: P, renderer: Renderer) -> Self {
        Self {
            state: ViewState::default(),
            load_state: LoadState::Idle,
            renderer,
            page,
            open_slug: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn into_page(self) -> P {
        self.page
    }

    pub fn open_slug(&self) -> Option<&str> {
        self.open_slug.as_deref()
    }

    /// Fetches the published posts and renders them.
    ///
    /// Meant to run once per page lifetime. There is no in-flight guard or
    /// retry: a second call simply replaces the posts when it completes.
    pub async fn load<S: PostSource>(&mut self, source: &S) -> Result<usize, LoadError> {
        self.load_state = LoadState::Loading;
        self.page.set_loading(true);
        self.page.set_error(None);

        match source.list_published_posts().await {
            Ok(posts) => {
                let count = posts.len();
                self.state.posts = posts;
                self.page.set_loading(false);
                self.load_state = LoadState::Ready { count };
                tracing::debug!(count, "Posts loaded");
                self.render();
                Ok(count)
            }
            Err(e) => {
                let err = LoadError::from(e);
                self.page.set_loading(false);
                self.page.set_error(Some(err.user_message()));
                tracing::error!(error = %err, kind = ?err.kind(), "Failed to load posts");
                self.load_state = LoadState::Failed {
                    kind: err.kind(),
                    detail: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Re-renders the filter controls and the grid from the current state.
    pub fn render(&mut self) {
        if !self.page.has_grid() {
            tracing::debug!("No grid container on page, skipping render");
            return;
        }

        let categories = distinct_categories(&self.state.posts);
        let tags = distinct_tags(&self.state.posts);
        self.page.set_category_controls(&render_category_controls(
            &categories,
            &self.state.selection.category,
        ));
        self.page
            .set_tag_controls(&render_tag_controls(&tags, self.state.selection.tag.as_deref()));
        self.page.set_search_value(&self.state.selection.query);

        let visible = self.state.visible_posts();
        tracing::debug!(
            visible = visible.len(),
            total = self.state.posts.len(),
            "Rendering grid"
        );
        let grid = self.renderer.render_grid(&visible);
        self.page.set_grid(&grid);
    }

    /// Selects a category (clearing the tag) and re-renders.
    pub fn select_category(&mut self, category: CategoryFilter) {
        self.state.selection.select_category(category);
        self.render();
    }

    /// Toggles the tag selection and re-renders.
    pub fn toggle_tag(&mut self, tag: &str) {
        self.state.selection.toggle_tag(tag);
        self.render();
    }

    /// Updates the search query and re-renders. Ignored when the page has
    /// no search input.
    pub fn set_search(&mut self, query: &str) {
        if !self.page.has_search_input() {
            return;
        }
        let query: String = query.chars().take(MAX_SEARCH_QUERY_LENGTH).collect();
        self.state.selection.set_query(&query);
        self.render();
    }

    /// Shows the post with `slug` in the modal and locks background scroll.
    pub fn open_detail(&mut self, slug: &str) {
        if !self.page.has_modal() {
            tracing::debug!(slug = %slug, "No modal on page, ignoring open");
            return;
        }
        let Some(post) = find_post(&self.state.posts, slug) else {
            tracing::warn!(slug = %slug, "Requested post not found");
            return;
        };

        let view = self.renderer.render_detail(post, &self.state.posts);
        self.page.show_modal(&view.html);
        self.page.set_scroll_locked(true);
        self.open_slug = Some(slug.to_string());
        tracing::debug!(slug = %slug, related = view.related.len(), "Opened detail view");
    }

    /// Hides the modal and restores background scroll. No-op when closed.
    pub fn close_detail(&mut self) {
        if self.open_slug.is_none() && !self.page.is_modal_open() {
            return;
        }
        self.page.hide_modal();
        self.page.set_scroll_locked(false);
        self.open_slug = None;
    }
}
