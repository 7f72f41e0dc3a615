//! HTTP client for the cloud API.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("cloudctl/", env!("CARGO_PKG_VERSION"));

/// Extract a human-readable message from an error response body.
///
/// Tries `message`, then `error_description`, then the raw body, and falls
/// back to the status reason phrase when the body is empty.
fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = json.get("message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
        if let Some(desc) = json.get("error_description").and_then(|v| v.as_str()) {
            return desc.to_string();
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.to_string()
    }
}

/// Authenticated client for the cloud API.
///
/// Every request carries `Authorization: Bearer <token>`. Requests are not
/// retried; a timeout is reported as [`ApiError::Timeout`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ApiClient {
    /// Create a client with the default timeout.
    pub fn new(base_url: &str, token: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout.
    pub fn with_timeout(
        base_url: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL by appending percent-encoded path segments to
    /// the base URL, keeping any path prefix the base URL already has.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        self.client
            .request(method, url.clone())
            .bearer_auth(&self.token)
    }

    /// Send a request and map transport failures and non-success statuses.
    async fn send(&self, method: Method, url: &Url, builder: RequestBuilder) -> ApiResult<Response> {
        debug!(%method, %url, "sending request");
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(url.to_string())
            } else {
                ApiError::Transport(e)
            }
        })?;
        debug!(%method, %url, status = response.status().as_u16(), "received response");
        check_response(response).await
    }

    /// `GET` a JSON document.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> ApiResult<T> {
        let response = self
            .send(Method::GET, url, self.request(Method::GET, url))
            .await?;
        decode_json(url, response).await
    }

    /// `PUT` a JSON body and return the successful response.
    pub(crate) async fn put_json<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &B,
    ) -> ApiResult<Response> {
        let builder = self.request(Method::PUT, url).json(body);
        self.send(Method::PUT, url, builder).await
    }
}

fn parse_base_url(base_url: &str) -> ApiResult<Url> {
    let url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ApiError::InvalidUrl(format!(
            "{base_url}: unsupported scheme '{other}'"
        ))),
    }
}

/// Map an HTTP response to an `ApiError` based on status code.
async fn check_response(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(status, &body);

    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized(message)),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound(message)),
        _ => Err(ApiError::Api {
            status: status.as_u16(),
            message,
        }),
    }
}

async fn decode_json<T: DeserializeOwned>(url: &Url, response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            ApiError::Timeout(url.to_string())
        } else {
            ApiError::Transport(e)
        }
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}
