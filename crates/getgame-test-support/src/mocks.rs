//! Fake backend served by `httpmock`.
//!
//! Every route is mounted under `/api/` so tests also exercise base-path
//! joining.

use httpmock::prelude::*;
use httpmock::{Mock, MockServer};
use url::Url;

/// CSRF token handed out by [`MockBackend::mock_csrf`].
pub const CSRF_TOKEN: &str = "test-csrf-token";

/// Header name the client sends the CSRF token in, as it appears on the wire.
pub const CSRF_HEADER: &str = "x-csrftoken";

/// An `httpmock` server posing as the backend.
pub struct MockBackend {
    server: MockServer,
}

impl MockBackend {
    /// Start a fresh server on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start_async().await,
        }
    }

    /// Underlying server, for custom mocks.
    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    /// API base URL to configure the client with.
    ///
    /// # Panics
    ///
    /// Panics if the mock server reports an unparsable base URL.
    #[must_use]
    pub fn api_url(&self) -> Url {
        Url::parse(&format!("{}/api/", self.server.base_url()))
            .unwrap_or_else(|err| panic!("mock server base URL is invalid: {err}"))
    }

    /// Absolute request path for an endpoint path relative to the API base.
    #[must_use]
    pub fn path(endpoint: &str) -> String {
        format!("/api/{endpoint}")
    }

    /// Serve [`CSRF_TOKEN`] from the CSRF endpoint.
    pub fn mock_csrf(&self) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(GET).path(Self::path("csrf/"));
            then.status(200)
                .json_body(serde_json::json!({ "csrfToken": CSRF_TOKEN }));
        })
    }

    /// Serve `body` from the session probe.
    pub fn mock_check_auth(&self, body: serde_json::Value) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(GET).path(Self::path("user/misc/check-auth/"));
            then.status(200).json_body(body);
        })
    }

    /// Serve `body` for one page of a paginated GET endpoint.
    pub fn mock_page(&self, endpoint: &str, page: u32, body: serde_json::Value) -> Mock<'_> {
        let path = Self::path(endpoint);
        self.server.mock(|when, then| {
            when.method(GET)
                .path(path)
                .query_param("page", page.to_string());
            then.status(200).json_body(body);
        })
    }
}
