//! User interaction events.
//!
//! The hosting page translates its clicks, input and key presses into
//! [`UiEvent`]s. Each event is handled synchronously to completion and
//! re-renders whatever it affects.

use crate::app::App;
use crate::filter::CategoryFilter;

use super::page::Page;

/// Keys the board reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The permanent "All" category control was clicked.
    AllCategoriesSelected,
    /// A category control was clicked; carries its `data-category` value.
    CategorySelected(String),
    /// A tag control was clicked; carries its `data-tag` value.
    TagClicked(String),
    /// The search input changed.
    SearchInput(String),
    /// A card's open control or a related-post entry was clicked.
    OpenPost(String),
    /// The modal's close control was clicked.
    CloseRequested,
    BackdropClicked,
    /// A key went down; `target` is the slug of the focused card, if any.
    KeyDown { key: Key, target: Option<String> },
}

/// Dispatches a single event against the controller.
pub fn handle_event<P: Page>(app: &mut App<P>, event: UiEvent) {
    tracing::trace!(event = ?event, "Handling UI event");

    match event {
        UiEvent::AllCategoriesSelected => app.select_category(CategoryFilter::All),
        UiEvent::CategorySelected(value) => app.select_category(CategoryFilter::from_value(&value)),
        UiEvent::TagClicked(tag) => app.toggle_tag(&tag),
        UiEvent::SearchInput(query) => app.set_search(&query),
        UiEvent::OpenPost(slug) => app.open_detail(&slug),
        UiEvent::CloseRequested | UiEvent::BackdropClicked => app.close_detail(),
        UiEvent::KeyDown { key, target } => match (key, target) {
            (Key::Escape, _) => app.close_detail(),
            (Key::Enter | Key::Space, Some(slug)) => app.open_detail(&slug),
            _ => {}
        },
    }
}
