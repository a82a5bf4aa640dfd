//! Cookie-carrying HTTP transport for the backend API.
//!
//! # Design
//! - One `reqwest::Client` with a cookie jar stands in for browser credentials;
//!   every request made through it carries the session cookie.
//! - State-mutating calls fetch a fresh CSRF token first and echo it in
//!   `X-CSRFToken`.
//! - Non-2xx responses become [`ClientError::Status`] with the backend's
//!   `{"error": ...}` message when one is present.

use getgame_api_models::{CsrfTokenResponse, ErrorBody, paths};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, HEADER_REQUEST_ID};
use crate::error::{ClientError, ClientResult};

/// Header the backend reads the anti-forgery token from.
pub const HEADER_CSRF: &str = "X-CSRFToken";

const MAX_TEXT_MESSAGE_LEN: usize = 200;

/// HTTP client bound to one API base URL and one cookie jar.
///
/// Cloning is cheap and clones share the cookie jar.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the request id is not a valid header value or the
    /// TLS backend fails to initialise.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut default_headers = HeaderMap::new();
        if let Some(request_id) = &config.request_id {
            let value = HeaderValue::from_str(request_id).map_err(|_| ClientError::RequestId)?;
            default_headers.insert(HEADER_REQUEST_ID, value);
        }

        let mut builder = Client::builder()
            .cookie_store(true)
            .default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|source| ClientError::Build { source })?;

        Ok(Self {
            client,
            base_url: config.api_url().clone(),
        })
    }

    /// API base URL every endpoint path is joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative endpoint path.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Endpoint`] when the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::Endpoint {
                path: path.to_string(),
                source,
            })
    }

    /// GET `path` with query pairs and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns transport, status, or decode errors.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        let response = self.send(path, self.client.get(url)).await?;
        decode(path, response).await
    }

    /// GET `path` with a pre-encoded query string forwarded untouched.
    ///
    /// # Errors
    ///
    /// Returns transport, status, or decode errors.
    pub async fn get_json_raw_query<T: DeserializeOwned>(
        &self,
        path: &str,
        raw_query: &str,
    ) -> ClientResult<T> {
        let mut url = self.endpoint(path)?;
        if !raw_query.is_empty() {
            url.set_query(Some(raw_query));
        }
        let response = self.send(path, self.client.get(url)).await?;
        decode(path, response).await
    }

    /// GET `path` and require a 2xx status, ignoring the body.
    ///
    /// # Errors
    ///
    /// Returns transport or status errors.
    pub async fn get_ok(&self, path: &str) -> ClientResult<()> {
        let url = self.endpoint(path)?;
        self.send(path, self.client.get(url)).await?;
        Ok(())
    }

    /// Fetch a fresh anti-forgery token for the current session.
    ///
    /// # Errors
    ///
    /// Returns transport, status, or decode errors.
    pub async fn csrf_token(&self) -> ClientResult<String> {
        let token: CsrfTokenResponse = self.get_json(paths::CSRF, &[]).await?;
        tracing::debug!("csrf token fetched");
        Ok(token.csrf_token)
    }

    /// POST a JSON body with a fresh CSRF token and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns transport, status, or decode errors from either the token
    /// request or the mutation itself.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.mutate(Method::POST, path, Some(body)).await?;
        decode(path, response).await
    }

    /// POST a JSON body with a fresh CSRF token, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns transport or status errors.
    pub async fn post<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.mutate(Method::POST, path, Some(body)).await?;
        Ok(())
    }

    /// DELETE `path` with a fresh CSRF token.
    ///
    /// # Errors
    ///
    /// Returns transport or status errors.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.mutate::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn mutate<B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let token = self.csrf_token().await?;
        let url = self.endpoint(path)?;
        let mut request = self
            .client
            .request(method, url)
            .header(HEADER_CSRF, token);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(path, request).await
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> ClientResult<Response> {
        tracing::debug!(endpoint, "sending request");
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let bytes = response.bytes().await.unwrap_or_default();
        let message = problem_message(&bytes);
        tracing::debug!(endpoint, %status, message = message.as_deref(), "request rejected");
        Err(ClientError::Status {
            endpoint: endpoint.to_string(),
            status,
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> ClientResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ClientError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Extract a short failure message from a non-2xx body.
fn problem_message(bytes: &[u8]) -> Option<String> {
    if let Ok(body) = serde_json::from_slice::<ErrorBody>(bytes) {
        return Some(body.error);
    }
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() || text.starts_with('<') || text.len() > MAX_TEXT_MESSAGE_LEN {
        None
    } else {
        Some(text.to_string())
    }
}
