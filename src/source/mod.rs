//! Remote data source for published posts.
//!
//! - [`types`] - The [`Post`] row and [`SourceError`]
//! - [`rest`] - [`PostSource`] trait and the HTTP table client
//!
//! The board never writes back; listing published posts is the only call.

mod rest;
mod types;

pub use rest::{PostSource, RestPostSource, DEFAULT_TIMEOUT_SECS, MAX_RESPONSE_SIZE};
pub use types::{Post, SourceError};
