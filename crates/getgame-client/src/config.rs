//! Client configuration.
//!
//! # Design
//! - The API base is normalised to end with `/` so relative endpoint paths
//!   join underneath it instead of replacing its last segment.
//! - No timeout is applied unless one is configured.

use std::time::Duration;

use url::Url;

/// Default backend location for local development.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/";

/// Header carrying the per-process request identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Settings used to build an [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: Url,
    /// Optional per-request timeout.
    pub timeout: Option<Duration>,
    /// Value sent in the `x-request-id` header on every request.
    pub request_id: Option<String>,
}

impl ClientConfig {
    /// Build a configuration rooted at `api_url`.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url: normalise_base(api_url),
            timeout: None,
            request_id: None,
        }
    }

    /// Apply a per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a request identifier header to every request.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Normalised API base URL, always ending in `/`.
    #[must_use]
    pub const fn api_url(&self) -> &Url {
        &self.api_url
    }
}

/// Parse an API URL supplied on the command line or in the environment.
///
/// # Errors
///
/// Returns a human-readable message when `input` is not an absolute
/// `http`/`https` URL.
pub fn parse_api_url(input: &str) -> Result<Url, String> {
    let url = input
        .trim()
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("invalid URL '{input}': unsupported scheme '{other}'")),
    }
}

fn normalise_base(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() -> Result<(), String> {
        let config = ClientConfig::new(parse_api_url("http://localhost:8000/api")?);
        assert_eq!(config.api_url().as_str(), "http://localhost:8000/api/");
        let joined = config
            .api_url()
            .join("user/games/")
            .map_err(|err| err.to_string())?;
        assert_eq!(joined.as_str(), "http://localhost:8000/api/user/games/");
        Ok(())
    }

    #[test]
    fn base_url_drops_query_and_fragment() -> Result<(), String> {
        let config = ClientConfig::new(parse_api_url("https://example.com/api/?x=1#frag")?);
        assert_eq!(config.api_url().as_str(), "https://example.com/api/");
        Ok(())
    }

    #[test]
    fn parse_api_url_rejects_other_schemes() {
        assert!(parse_api_url("ftp://example.com").is_err());
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn default_points_at_local_backend() -> Result<(), String> {
        let config = ClientConfig::new(parse_api_url(DEFAULT_API_URL)?)
            .with_timeout(Duration::from_secs(5))
            .with_request_id("trace");
        assert_eq!(config.api_url().as_str(), DEFAULT_API_URL);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.request_id.as_deref(), Some("trace"));
        Ok(())
    }
}
