//! Insight board: loads published posts from a remote table and renders them
//! as a filterable card grid with a detail modal and related-post links.
//!
//! - [`source`] - Remote data source
//! - [`filter`] - Filtering and related-post scoring
//! - [`content`] - Post body decoding, Markdown conversion, sanitizing
//! - [`ui`] - Page contract, renderer and interaction events
//! - [`app`] - View state, load state machine and controller
//! - [`config`] - TOML configuration
//! - [`util`] - Text and URL helpers

pub mod app;
pub mod config;
pub mod content;
pub mod filter;
pub mod source;
pub mod ui;
pub mod util;
