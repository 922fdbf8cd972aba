//! Configuration file parser for ~/.config/insights/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning when the file
//! contains potential typos.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::filter::DEFAULT_RELATED_LIMIT;
use crate::source::DEFAULT_TIMEOUT_SECS;
use crate::util::{DEFAULT_EXCERPT_LENGTH, DEFAULT_MAX_DECODE_PASSES, DEFAULT_WORDS_PER_MINUTE};

/// Environment variable that overrides `api_key`.
pub const API_KEY_ENV: &str = "INSIGHTS_API_KEY";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// The custom Debug impl masks `api_key`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the data service, e.g. `https://project.supabase.co`.
    pub source_url: Option<String>,

    /// Table holding the posts.
    pub posts_table: String,

    /// Service API key (alternative to the INSIGHTS_API_KEY env var).
    /// Env var takes precedence over config file.
    pub api_key: Option<String>,

    /// Timeout for the posts request, in seconds.
    pub request_timeout_secs: u64,

    /// Card excerpt length in characters.
    pub excerpt_length: usize,

    /// Reading speed behind the "N min read" estimate.
    pub words_per_minute: usize,

    /// Upper bound on entity-decoding passes for stored content.
    pub max_decode_passes: usize,

    /// Number of related posts under a detail view.
    pub related_limit: usize,

    /// Stand-alone detail page targeted by deep links.
    pub detail_page: String,

    /// Insert post content without sanitizing. Local diagnosis only.
    pub unsafe_raw_html: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: None,
            posts_table: "posts".to_string(),
            api_key: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            max_decode_passes: DEFAULT_MAX_DECODE_PASSES,
            related_limit: DEFAULT_RELATED_LIMIT,
            detail_page: "insight.html".to_string(),
            unsafe_raw_html: false,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("source_url", &self.source_url)
            .field("posts_table", &self.posts_table)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("excerpt_length", &self.excerpt_length)
            .field("words_per_minute", &self.words_per_minute)
            .field("max_decode_passes", &self.max_decode_passes)
            .field("related_limit", &self.related_limit)
            .field("detail_page", &self.detail_page)
            .field("unsafe_raw_html", &self.unsafe_raw_html)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 10] = [
        "source_url",
        "posts_table",
        "api_key",
        "request_timeout_secs",
        "excerpt_length",
        "words_per_minute",
        "max_decode_passes",
        "related_limit",
        "detail_page",
        "unsafe_raw_html",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.iter().any(|known| *known == key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        if config.unsafe_raw_html {
            tracing::warn!(path = %path.display(), "unsafe_raw_html is enabled in config");
        }
        tracing::info!(path = %path.display(), table = %config.posts_table, "Loaded configuration");
        Ok(config)
    }

    /// The API key, preferring the environment over the file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
