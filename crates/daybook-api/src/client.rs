//! HTTP client configuration and request plumbing.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::envelope::ApiResponse;
use crate::error::{Error, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body kept in [`Error::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Client for the Daybook backend.
///
/// Cloning is cheap: clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL, always ending in `/`.
    base_url: Url,
    /// Bearer token for authenticated endpoints.
    token: Option<String>,
    /// HTTP client.
    http_client: Client,
}

impl ApiClient {
    /// Creates a client for the given base URL with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// built.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: normalize_base(base_url)?,
            token: None,
            http_client,
        })
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replaces or clears the bearer token.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Returns true if a bearer token is set.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an API path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Starts a request with auth applied.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!("{method} {url}");
        let builder = self.http_client.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Sends a request and unwraps the envelope's `data`.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &'static str,
    ) -> Result<T> {
        self.execute_optional(builder)
            .await?
            .ok_or(Error::MissingData(what))
    }

    /// Sends a request and unwraps the envelope, allowing empty `data`.
    pub(crate) async fn execute_optional<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>> {
        let response = send_checked(builder).await?;
        let envelope: ApiResponse<T> = response.json().await?;
        envelope.into_result()
    }

    /// Sends a request whose payload is irrelevant.
    pub(crate) async fn execute_unit(&self, builder: RequestBuilder) -> Result<()> {
        self.execute_optional::<serde_json::Value>(builder)
            .await
            .map(|_| ())
    }

    /// Sends a request that answers with a token stream.
    pub(crate) async fn execute_stream(
        &self,
        builder: RequestBuilder,
        on_token: impl FnMut(&str),
    ) -> Result<String> {
        let response = send_checked(builder).await?;
        crate::stream::read_reply(response, on_token).await
    }
}

/// Sends a request and turns non-2xx statuses into errors.
///
/// Error bodies that carry an envelope are reported as [`Error::Api`].
async fn send_checked(builder: RequestBuilder) -> Result<Response> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
        if let Some(msg) = envelope.msg {
            return Err(Error::api_error(i64::from(status.as_u16()), msg));
        }
    }

    Err(Error::Status {
        status: status.as_u16(),
        body: truncate(&body, MAX_ERROR_BODY),
    })
}

fn normalize_base(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidConfig("base URL is empty".to_string()));
    }
    let mut url = Url::parse(trimmed)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidConfig(format!(
            "unsupported scheme: {}",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}
