//! End-to-end interaction tests: load, filter, search, open and close the
//! detail view through `UiEvent`s, checking the resulting page.

use insights::app::App;
use insights::source::{Post, PostSource, SourceError};
use insights::ui::{handle_event, Key, Renderer, StaticPage, UiEvent, EMPTY_GRID_PLACEHOLDER};
use pretty_assertions::assert_eq;

struct Fixture(Vec<Post>);

impl PostSource for Fixture {
    async fn list_published_posts(&self) -> Result<Vec<Post>, SourceError> {
        Ok(self.0.clone())
    }
}

fn post(slug: &str, title: &str, category: Option<&str>, tags: &[&str], content: &str) -> Post {
    Post {
        title: title.to_string(),
        slug: slug.to_string(),
        content: content.to_string(),
        published_at: "2024-10-03T00:00:00+00:00".to_string(),
        category: category.map(str::to_string),
        tags: Some(tags.iter().map(|t| t.to_string()).collect()),
        author: Some("Robin".to_string()),
        is_published: true,
    }
}

fn posts() -> Vec<Post> {
    vec![
        post("a", "Async Rust", Some("Tech"), &["x", "y"], "Futures and **executors**"),
        post("b", "Borrowing", Some("Tech"), &["x"], "<p>Ownership rules</p>"),
        post("c", "Saying Hello", Some("Life"), &[], ""),
    ]
}

async fn board() -> App<StaticPage> {
    let mut app = App::new(StaticPage::complete(), Renderer::default());
    app.load(&Fixture(posts())).await.unwrap();
    app
}

/// Slugs of the rendered cards, in grid order.
fn grid_slugs(app: &App<StaticPage>) -> Vec<String> {
    let grid = app.page().grid.as_deref().unwrap_or_default();
    grid.split("<article class=\"insight-card\" data-slug=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_initial_grid_shows_all_posts_in_order() {
    let app = board().await;
    assert_eq!(grid_slugs(&app), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_category_click_filters_and_clears_tag() {
    let mut app = board().await;
    handle_event(&mut app, UiEvent::TagClicked("y".into()));
    assert_eq!(grid_slugs(&app), vec!["a"]);

    handle_event(&mut app, UiEvent::CategorySelected("Life".into()));
    assert_eq!(app.state().selection.tag, None);
    assert_eq!(grid_slugs(&app), vec!["c"]);

    handle_event(&mut app, UiEvent::AllCategoriesSelected);
    assert_eq!(grid_slugs(&app), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_tag_click_toggles() {
    let mut app = board().await;
    handle_event(&mut app, UiEvent::TagClicked("x".into()));
    assert_eq!(grid_slugs(&app), vec!["a", "b"]);
    assert!(app
        .page()
        .tag_controls
        .as_deref()
        .unwrap()
        .contains("class=\"filter-chip is-active\" data-tag=\"x\""));

    handle_event(&mut app, UiEvent::TagClicked("x".into()));
    assert_eq!(app.state().selection.tag, None);
    assert_eq!(grid_slugs(&app), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_search_is_case_insensitive_on_title() {
    let mut app = board().await;
    handle_event(&mut app, UiEvent::SearchInput("hello".into()));
    assert_eq!(grid_slugs(&app), vec!["c"]);
}

#[tokio::test]
async fn test_search_without_matches_shows_placeholder() {
    let mut app = board().await;
    handle_event(&mut app, UiEvent::SearchInput("nothing like this".into()));
    assert_eq!(app.page().grid.as_deref(), Some(EMPTY_GRID_PLACEHOLDER));
    assert!(app.page().status.as_ref().unwrap().error.is_none());
}

#[tokio::test]
async fn test_open_detail_and_follow_related_post() {
    let mut app = board().await;
    handle_event(&mut app, UiEvent::OpenPost("a".into()));
    let modal = app.page().modal.as_ref().unwrap();
    assert!(modal.open);
    assert!(modal.content.contains("<strong>executors</strong>"));
    assert!(modal.content.contains("class=\"related-post\" data-slug=\"b\""));
    assert!(app.page().scroll_locked);

    // Clicking a related entry swaps the modal content
    handle_event(&mut app, UiEvent::OpenPost("b".into()));
    assert_eq!(app.open_slug(), Some("b"));
    let modal = app.page().modal.as_ref().unwrap();
    assert!(modal.content.contains("Ownership rules"));
    assert!(modal.content.contains("class=\"related-post\" data-slug=\"a\""));
}

#[tokio::test]
async fn test_keyboard_open_and_escape() {
    let mut app = board().await;
    handle_event(
        &mut app,
        UiEvent::KeyDown {
            key: Key::Enter,
            target: Some("c".into()),
        },
    );
    assert_eq!(app.open_slug(), Some("c"));

    handle_event(
        &mut app,
        UiEvent::KeyDown {
            key: Key::Escape,
            target: None,
        },
    );
    assert!(!app.page().modal.as_ref().unwrap().open);
    assert!(!app.page().scroll_locked);
}

#[tokio::test]
async fn test_backdrop_and_close_control() {
    let mut app = board().await;
    handle_event(&mut app, UiEvent::OpenPost("a".into()));
    handle_event(&mut app, UiEvent::BackdropClicked);
    assert_eq!(app.open_slug(), None);

    handle_event(&mut app, UiEvent::OpenPost("a".into()));
    handle_event(&mut app, UiEvent::CloseRequested);
    handle_event(&mut app, UiEvent::CloseRequested);
    assert_eq!(app.open_slug(), None);
    assert!(!app.page().scroll_locked);
}

#[tokio::test]
async fn test_other_keys_do_nothing() {
    let mut app = board().await;
    handle_event(
        &mut app,
        UiEvent::KeyDown {
            key: Key::Other,
            target: Some("a".into()),
        },
    );
    assert_eq!(app.open_slug(), None);
}

#[tokio::test]
async fn test_document_reflects_state() {
    let mut app = board().await;
    handle_event(&mut app, UiEvent::SearchInput("rust".into()));
    handle_event(&mut app, UiEvent::OpenPost("a".into()));
    let doc = app.page().to_document("Insights");
    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert!(doc.contains("value=\"rust\""));
    assert!(doc.contains("<body class=\"modal-open\">"));
    assert!(doc.contains("insight-detail__title\">Async Rust</h2>"));
}

#[tokio::test]
async fn test_tag_control_matches_padded_stored_tag() {
    let mut app = App::new(StaticPage::complete(), Renderer::default());
    app.load(&Fixture(vec![
        post("padded", "Padded", None, &[" rust "], "body"),
        post("plain", "Plain", None, &["go"], "body"),
    ]))
    .await
    .unwrap();

    let controls = app.page().tag_controls.clone().unwrap();
    assert!(controls.contains("data-tag=\"rust\""));

    handle_event(&mut app, UiEvent::TagClicked("rust".into()));
    assert_eq!(grid_slugs(&app), vec!["padded"]);
    assert!(app
        .page()
        .tag_controls
        .as_deref()
        .unwrap()
        .contains("class=\"filter-chip is-active\" data-tag=\"rust\""));

    handle_event(&mut app, UiEvent::TagClicked("rust".into()));
    assert_eq!(grid_slugs(&app), vec!["padded", "plain"]);
}

#[tokio::test]
async fn test_category_named_all_is_not_the_all_control() {
    let mut app = App::new(StaticPage::complete(), Renderer::default());
    app.load(&Fixture(vec![
        post("one", "One", Some("All"), &[], "body"),
        post("two", "Two", Some("Tech"), &[], "body"),
    ]))
    .await
    .unwrap();

    handle_event(&mut app, UiEvent::CategorySelected("All".into()));
    assert_eq!(grid_slugs(&app), vec!["one"]);
    let controls = app.page().category_controls.as_deref().unwrap();
    assert_eq!(controls.matches("is-active").count(), 1);
    assert!(controls.contains("data-category-all aria-pressed=\"false\""));

    handle_event(&mut app, UiEvent::AllCategoriesSelected);
    assert_eq!(grid_slugs(&app), vec!["one", "two"]);
}

#[tokio::test]
async fn test_search_with_surrounding_spaces_matches_as_typed() {
    let mut app = board().await;
    handle_event(&mut app, UiEvent::SearchInput(" rules".into()));
    assert_eq!(grid_slugs(&app), vec!["b"]);

    // "rules" ends the text, so nothing follows it
    handle_event(&mut app, UiEvent::SearchInput("rules ".into()));
    assert_eq!(app.page().grid.as_deref(), Some(EMPTY_GRID_PLACEHOLDER));
}
