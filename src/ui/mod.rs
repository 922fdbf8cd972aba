//! Presentation layer.
//!
//! This module turns view state into markup and user input into state
//! changes:
//! - [`Page`] contract for the hosting page, with the in-memory [`StaticPage`]
//! - [`Renderer`] for cards, filter controls and the detail modal
//! - [`UiEvent`] dispatch via [`handle_event`]
//!
//! # Module Structure
//!
//! - `page` - Hosting page contract points
//! - `render` - Renderer construction and options
//! - `grid` - Card grid
//! - `detail` - Detail modal with related posts
//! - `filters` - Category and tag control bars
//! - `events` - Interaction events

mod detail;
mod events;
mod filters;
mod grid;
mod page;
mod render;

pub use detail::DetailView;
pub use events::{handle_event, Key, UiEvent};
pub use filters::{render_category_controls, render_tag_controls};
pub use grid::EMPTY_GRID_PLACEHOLDER;
pub use page::{Modal, Page, StaticPage, StatusArea};
pub use render::{RenderOptions, Renderer, UNCATEGORIZED_LABEL};
