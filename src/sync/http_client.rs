//! HTTP client for the outage API
//!
//! This module provides a thin wrapper around `reqwest` that authorizes every
//! request with the API key, applies a per-attempt timeout, and converts HTTP
//! error statuses into [`SyncError`] variants. It performs exactly one attempt
//! per call, buffering the whole body within that attempt; retrying is the
//! caller's concern.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SyncError;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Per-attempt request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const JSON_MEDIA_TYPE: &str = "application/json";

/// Error body returned by the API alongside JSON error responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Authorized HTTP client bound to one API base URI
///
/// Cloning is cheap and clones share the underlying connection pool, which is
/// safe to use from concurrent requests.
#[derive(Debug, Clone)]
pub struct ApiHttpClient {
    client: Client,
    base_uri: Url,
    api_key: String,
    timeout: Duration,
}

impl ApiHttpClient {
    /// Create a new client with the default timeout
    pub fn new(base_uri: &str, api_key: &str) -> Result<Self, SyncError> {
        let client = Client::builder().build().map_err(SyncError::transport)?;
        Self::with_client(client, base_uri, api_key, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom reqwest Client and timeout
    pub fn with_client(
        client: Client,
        base_uri: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        if api_key.trim().is_empty() {
            return Err(SyncError::InvalidArgument(
                "A non-blank API key is required.".to_string(),
            ));
        }
        if base_uri.trim().is_empty() {
            return Err(SyncError::InvalidArgument(
                "A non-blank base URI is required.".to_string(),
            ));
        }

        let base_uri = Url::parse(base_uri.trim()).map_err(|e| {
            SyncError::InvalidArgument(format!("Base URI is not valid: {}", e))
        })?;
        if base_uri.cannot_be_a_base() {
            return Err(SyncError::InvalidArgument(format!(
                "Base URI is not valid: {}",
                base_uri
            )));
        }

        Ok(Self {
            client,
            base_uri,
            api_key: api_key.to_string(),
            timeout,
        })
    }

    /// Build an endpoint URL by appending path segments to the base URI
    ///
    /// Segments are percent-encoded, so ids containing `/` or spaces stay a
    /// single segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, SyncError> {
        let mut url = self.base_uri.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SyncError::InvalidArgument(format!("Base URI is not valid: {}", self.base_uri))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Perform a GET request and return the response body
    pub async fn get(&self, url: &Url) -> Result<Bytes, SyncError> {
        debug!(url = %url, "Sending HTTP GET request");

        let request = self.client.get(url.clone());
        self.send(request, url).await
    }

    /// Perform a POST request with a JSON body and return the response body
    pub async fn post_json<B>(&self, url: &Url, body: &B) -> Result<Bytes, SyncError>
    where
        B: Serialize + ?Sized,
    {
        debug!(url = %url, "Sending HTTP POST request");

        let request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .json(body);
        self.send(request, url).await
    }

    /// Get the per-attempt timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the base URI
    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    /// Send one attempt; the timeout covers reading the body as well
    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Bytes, SyncError> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                SyncError::transport(e)
            })?;

        let body = classify_response(response)
            .await?
            .bytes()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Failed to read response body");
                SyncError::transport(e)
            })?;

        debug!(url = %url, body_size = body.len(), "Received response");
        Ok(body)
    }
}

/// Decode a response body as JSON
pub fn decode_json<T: DeserializeOwned>(url: &Url, body: &[u8]) -> Result<T, SyncError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(url = %url, error = %e, "Failed to decode response body");
        SyncError::remote(format!("Invalid response body from {}: {}", url, e))
    })
}

/// Convert an HTTP error status into a [`SyncError`]
///
/// Statuses below 400 pass the response through unchanged. For error statuses
/// the message is taken from the `message` field of a JSON body, falling back
/// to the status text.
pub async fn classify_response(response: Response) -> Result<Response, SyncError> {
    let status = response.status();
    if status.as_u16() < 400 {
        return Ok(response);
    }

    let url = response.url().clone();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with(JSON_MEDIA_TYPE))
        .unwrap_or(false);

    let status_text = status
        .canonical_reason()
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    let message = if is_json {
        response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(status_text)
    } else {
        status_text
    };

    warn!(url = %url, status = status.as_u16(), message = %message, "API returned error status");

    Err(error_for_status(status, message))
}

/// Map an error status and message to the matching [`SyncError`] variant
pub fn error_for_status(status: StatusCode, message: String) -> SyncError {
    match status {
        StatusCode::BAD_REQUEST => SyncError::InvalidRequest(message),
        StatusCode::FORBIDDEN => SyncError::AccessDenied(message),
        StatusCode::NOT_FOUND => SyncError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => SyncError::RateLimited(message),
        _ => SyncError::remote(message),
    }
}
