use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors that can occur while validating the data source base URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain HTTP to a non-loopback host.
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    Insecure,
}

/// Validates the base URL of the remote posts table.
///
/// The API key travels in request headers, so anything other than HTTPS is
/// rejected. Plain HTTP is tolerated only for loopback hosts, which is what
/// local test servers bind to.
///
/// # Examples
///
/// ```
/// use insights::util::validate_source_url;
///
/// assert!(validate_source_url("https://project.supabase.co").is_ok());
/// assert!(validate_source_url("http://127.0.0.1:54321").is_ok());
/// assert!(validate_source_url("http://example.com").is_err());
/// ```
pub fn validate_source_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "https" => Ok(url),
        "http" if is_loopback_host(&url) => {
            tracing::warn!(base_url = %url, "Using non-HTTPS data source URL (localhost only)");
            Ok(url)
        }
        "http" => Err(UrlValidationError::Insecure),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}

fn is_loopback_host(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    if host == "localhost" {
        return true;
    }

    // Strip brackets from IPv6 addresses for parsing
    let host_for_parse = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    host_for_parse
        .parse::<IpAddr>()
        .is_ok_and(|ip| ip.is_loopback())
}

/// Builds the link to the stand-alone detail page for a post.
///
/// The slug travels URL-encoded in the `slug` query parameter.
///
/// ```
/// use insights::util::detail_href;
///
/// assert_eq!(detail_href("insight.html", "a b&c"), "insight.html?slug=a+b%26c");
/// ```
pub fn detail_href(detail_page: &str, slug: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(slug.as_bytes()).collect();
    format!("{detail_page}?slug={encoded}")
}
