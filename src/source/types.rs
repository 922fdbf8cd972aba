use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while listing posts from the remote table.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The service answered but reported a failure.
    #[error("Service error (status {status}): {message}")]
    Service { status: u16, message: String },
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// No complete response (headers and body) within the deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// The body was not a JSON array of posts.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
    #[error("Invalid data source URL: {0}")]
    InvalidUrl(String),
}

impl SourceError {
    /// True when the service itself reported the failure, as opposed to the
    /// request never completing or the response being unusable.
    pub fn is_service_error(&self) -> bool {
        matches!(self, SourceError::Service { .. })
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A published article row.
///
/// Column names follow the remote table (`published_at`, `is_published`).
/// `content` is raw HTML or Markdown and may be entity-escaped one or more
/// times by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    /// Only the leading `YYYY-MM-DD` is meaningful.
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default = "default_published")]
    pub is_published: bool,
}

fn default_published() -> bool {
    true
}

impl Post {
    /// Tags in their stored order; empty when the column is null.
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Category with blank values treated as absent.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
