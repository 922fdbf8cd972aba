use std::future::Future;
use std::time::Duration;

use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::types::{Post, SourceError};
use crate::util::{validate_source_url, UrlValidationError};

/// Default cap on the response body.
pub const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Anything that can list the published posts, newest first.
pub trait PostSource {
    fn list_published_posts(&self) -> impl Future<Output = Result<Vec<Post>, SourceError>>;
}

/// Error body returned by PostgREST-style services.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Reads posts from a REST table endpoint (`{base}/rest/v1/{table}`).
///
/// The request filters server-side to `is_published = true` and orders by
/// `published_at` descending. The API key, when present, is sent as both the
/// `apikey` header and a bearer token.
pub struct RestPostSource {
    client: reqwest::Client,
    endpoint: url::Url,
    api_key: Option<SecretString>,
    timeout: Duration,
    max_response_size: usize,
}

impl std::fmt::Debug for RestPostSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestPostSource")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RestPostSource {
    /// Creates a source for `table` under `base_url`.
    ///
    /// Fails when the base URL is not HTTPS (loopback hosts excepted).
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        table: &str,
        api_key: Option<SecretString>,
    ) -> Result<Self, SourceError> {
        let base = validate_source_url(base_url).map_err(|e| match e {
            UrlValidationError::Insecure => {
                tracing::error!(base_url = %base_url, "Rejecting non-HTTPS data source URL");
                SourceError::InsecureBaseUrl
            }
            other => SourceError::InvalidUrl(other.to_string()),
        })?;

        let mut endpoint = base
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        endpoint
            .query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("is_published", "eq.true")
            .append_pair("order", "published_at.desc");

        Ok(Self {
            client,
            endpoint,
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_response_size: MAX_RESPONSE_SIZE,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_response_size(mut self, limit: usize) -> Self {
        self.max_response_size = limit;
        self
    }

    /// The full request URL, including the filter and ordering parameters.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn fetch(&self) -> Result<Vec<Post>, SourceError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header("Accept", "application/json");

        if let Some(key) = &self.api_key {
            tracing::trace!("Data source authentication configured");
            request = request
                .header("apikey", key.expose_secret())
                .header("Authorization", format!("Bearer {}", key.expose_secret()));
        }

        // The deadline covers the body too; a stalled stream must not hang the load
        let exchange = async {
            let response = request.send().await.map_err(SourceError::Network)?;
            let status = response.status();
            let body = read_limited(response, self.max_response_size).await?;
            Ok::<_, SourceError>((status, body))
        };
        let (status, body) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| SourceError::Timeout(self.timeout))??;

        if !status.is_success() {
            return Err(SourceError::Service {
                status: status.as_u16(),
                message: service_message(&body, status),
            });
        }

        let posts: Vec<Post> = serde_json::from_slice(&body)?;
        let total = posts.len();
        let published: Vec<Post> = posts.into_iter().filter(|p| p.is_published).collect();
        if published.len() != total {
            tracing::debug!(
                dropped = total - published.len(),
                "Dropped unpublished rows returned by data source"
            );
        }

        Ok(published)
    }
}

impl PostSource for RestPostSource {
    async fn list_published_posts(&self) -> Result<Vec<Post>, SourceError> {
        tracing::debug!(endpoint = %self.endpoint, "Listing published posts");
        let posts = self.fetch().await?;
        tracing::info!(count = posts.len(), "Loaded published posts");
        Ok(posts)
    }
}

/// Extracts the human-readable message from an error body, falling back to
/// the HTTP reason phrase.
fn service_message(body: &[u8], status: reqwest::StatusCode) -> String {
    serde_json::from_slice::<ServiceErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

async fn read_limited(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, SourceError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(SourceError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(SourceError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(SourceError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
