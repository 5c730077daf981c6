// ABOUTME: HTTP session client with bearer-token attachment and silent 401 token refresh
// ABOUTME: Single choke point for all outbound API calls made by Forma hosts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! HTTP session client
//!
//! [`ApiClient`] owns the transport and applies the full request pipeline:
//! method validation, base-URL resolution, body serialization, bearer-token
//! attachment, and transparent refresh-and-retry on an expired access token.
//!
//! Per logical request the lifecycle is:
//!
//! ```text
//! DISPATCHED --2xx--> SUCCEEDED
//! DISPATCHED --401 (non-auth URL, first attempt)--> REFRESHING
//! DISPATCHED --other failure--> FAILED
//! REFRESHING --refresh ok--> RETRIED --> SUCCEEDED | FAILED
//! REFRESHING --refresh fails--> FAILED (original 401, tokens cleared)
//! ```
//!
//! The retry re-enters the low-level send step directly rather than the full
//! pipeline, so a request can never refresh twice. Concurrent requests that
//! each receive a 401 refresh independently; the token store write race is
//! benign (last write wins).

use std::error::Error as StdError;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::errors::{ApiError, ApiResult, NETWORK_ERROR_MESSAGE, UNKNOWN_ERROR_MESSAGE};
use crate::models::{
    ApiResponse, HttpMethod, MultipartField, RequestBody, RequestDescriptor, RequestOptions,
    TokenPair,
};
use crate::token_store::{TokenKind, TokenStore};

/// Relative path of the fixed token refresh endpoint
const REFRESH_PATH: &str = "auth/refresh-token";

/// Endpoints exempt from refresh interception, matched by URL substring
///
/// A 401 from any of these is an auth-bootstrap failure, not an expired
/// access token; recovering would loop on the refresh call itself.
const AUTH_BOOTSTRAP_PATHS: [&str; 3] = ["/auth/login", "/auth/register", "/auth/refresh-token"];

/// Refresh request payload sent to [`REFRESH_PATH`]
#[derive(Debug, Serialize)]
struct RefreshRequest {
    refresh_token: String,
}

/// HTTP session client for the Forma API
///
/// Explicitly constructed and passed by handle to the endpoint modules;
/// there is no ambient global client. Cheap to share via [`Arc`].
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a client from a configuration and a token store binding
    ///
    /// # Errors
    /// Returns an error if the underlying transport cannot be constructed
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::network(format!("Failed to build HTTP transport: {e}")))?;

        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    /// The token store this client reads and writes
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// The configuration this client was built with
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a request and decode the response body as JSON
    ///
    /// The sole entry point for JSON endpoints; all typed endpoint modules
    /// call through here exclusively. `body` is ignored for GET and DELETE.
    ///
    /// # Errors
    /// Returns a normalized [`ApiError`] for every failure: unsupported
    /// method (before any I/O), non-2xx response (after the single silent
    /// refresh attempt where applicable), or transport failure
    pub async fn execute<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
        body: Option<RequestBody>,
        options: Option<RequestOptions>,
    ) -> ApiResult<ApiResponse<T>> {
        let response = self.dispatch(descriptor, body.as_ref(), options.as_ref()).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| normalize_transport_error(&e))?;

        // Empty bodies (204-style responses) decode as JSON null so unit and
        // optional target types still succeed.
        let data = if bytes.is_empty() {
            serde_json::from_slice(b"null")
        } else {
            serde_json::from_slice(&bytes)
        }
        .map_err(|e| ApiError::network(format!("Failed to decode response body: {e}")))?;

        Ok(ApiResponse { data })
    }

    /// Execute a request and return the raw response bytes
    ///
    /// Used for binary downloads (progress exports, attachments) where JSON
    /// decoding does not apply. Runs the identical pipeline as [`execute`],
    /// including the silent refresh flow.
    ///
    /// # Errors
    /// Returns a normalized [`ApiError`] on any failure
    ///
    /// [`execute`]: Self::execute
    pub async fn execute_bytes(
        &self,
        descriptor: &RequestDescriptor,
        body: Option<RequestBody>,
        options: Option<RequestOptions>,
    ) -> ApiResult<ApiResponse<Bytes>> {
        let response = self.dispatch(descriptor, body.as_ref(), options.as_ref()).await?;
        let data = response
            .bytes()
            .await
            .map_err(|e| normalize_transport_error(&e))?;
        Ok(ApiResponse { data })
    }

    /// Full request pipeline up to a successful response
    async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
        body: Option<&RequestBody>,
        options: Option<&RequestOptions>,
    ) -> ApiResult<reqwest::Response> {
        // Method validation happens before any I/O
        let method: HttpMethod = descriptor.method.parse()?;
        let url = self.resolve_url(&descriptor.url);

        debug!("[API Request] {} {}", method.as_str(), url);

        let access = self.tokens.get_token(TokenKind::Access).await?;
        match self
            .send(method, &url, body, options, access.as_deref())
            .await
        {
            Ok(response) => Ok(response),
            Err(original) => {
                if original.status() == Some(401) && !is_auth_bootstrap(&url) {
                    self.refresh_and_retry(method, &url, body, options, original)
                        .await
                } else {
                    Err(original)
                }
            }
        }
    }

    /// Single silent recovery attempt for an expired access token
    ///
    /// Any failure along the refresh path clears the stored tokens and
    /// propagates the original 401 so callers always observe one consistent
    /// unauthenticated signal. The retry goes straight back to [`Self::send`],
    /// so a second refresh on the same logical request is unrepresentable.
    async fn refresh_and_retry(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&RequestBody>,
        options: Option<&RequestOptions>,
        original: ApiError,
    ) -> ApiResult<reqwest::Response> {
        match self.refresh_access_token().await {
            Ok(access) => {
                debug!("[API Request] retrying {} {} after token refresh", method.as_str(), url);
                self.send(method, url, body, options, Some(&access)).await
            }
            Err(refresh_error) => {
                debug!("Token refresh failed: {refresh_error}");
                if let Err(e) = self.tokens.clear_tokens().await {
                    warn!("Failed to clear tokens after refresh failure: {e}");
                }
                Err(original)
            }
        }
    }

    /// Exchange the stored refresh token for a new access token
    ///
    /// Calls the refresh endpoint directly on the transport, bypassing the
    /// interceptor pipeline. Persists the returned access token, and the
    /// refresh token only when the server rotated it.
    async fn refresh_access_token(&self) -> ApiResult<String> {
        let refresh = self
            .tokens
            .get_token(TokenKind::Refresh)
            .await?
            .ok_or_else(|| ApiError::network("No refresh token available"))?;

        let response = self
            .http
            .post(self.resolve_url(REFRESH_PATH))
            .json(&RefreshRequest {
                refresh_token: refresh,
            })
            .send()
            .await
            .map_err(|e| normalize_transport_error(&e))?;

        if !response.status().is_success() {
            return Err(normalize_response(response).await);
        }

        let pair: TokenPair = response
            .json()
            .await
            .map_err(|e| ApiError::network(format!("Failed to decode refresh response: {e}")))?;

        self.tokens
            .set_token(TokenKind::Access, &pair.access_token)
            .await?;
        if let Some(rotated) = &pair.refresh_token {
            self.tokens.set_token(TokenKind::Refresh, rotated).await?;
        }

        Ok(pair.access_token)
    }

    /// Build and send one transport request; non-2xx responses come back as
    /// normalized errors
    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&RequestBody>,
        options: Option<&RequestOptions>,
        access: Option<&str>,
    ) -> ApiResult<reqwest::Response> {
        let mut request = self.http.request(method.as_reqwest(), url);

        if let Some(opts) = options {
            if !opts.query.is_empty() {
                request = request.query(&opts.query);
            }
        }

        if let Some(token) = access {
            request = request.bearer_auth(token);
        }

        if method.allows_body() {
            if let Some(payload) = body {
                request = attach_body(request, payload)?;
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| normalize_transport_error(&e))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(normalize_response(response).await)
        }
    }

    /// Resolve a descriptor URL against the configured base URL
    ///
    /// Absolute URLs pass through untouched; relative paths concatenate onto
    /// the base (which always ends in `/`).
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_owned()
        } else {
            format!("{}{}", self.config.base_url, url.trim_start_matches('/'))
        }
    }
}

/// Whether a URL targets one of the auth-bootstrap endpoints
fn is_auth_bootstrap(url: &str) -> bool {
    AUTH_BOOTSTRAP_PATHS.iter().any(|path| url.contains(path))
}

/// Apply the body serialization policy to an outbound request
///
/// JSON bodies are serialized to a string explicitly with the content type
/// pinned; multipart bodies carry no explicit content type so the transport
/// can supply the boundary; raw bytes pass through unmodified.
fn attach_body(
    request: reqwest::RequestBuilder,
    body: &RequestBody,
) -> ApiResult<reqwest::RequestBuilder> {
    match body {
        RequestBody::Json(value) => {
            let serialized = serde_json::to_string(value)
                .map_err(|e| ApiError::network(format!("Failed to serialize request body: {e}")))?;
            Ok(request
                .header(CONTENT_TYPE, "application/json")
                .body(serialized))
        }
        RequestBody::Multipart(fields) => Ok(request.multipart(build_form(fields)?)),
        RequestBody::Raw(bytes) => Ok(request.body(bytes.clone())),
    }
}

/// Rebuildable multipart form construction
///
/// Fields are kept as owned data in [`RequestBody`] so the form can be
/// reconstructed for the refresh-triggered retry.
fn build_form(fields: &[MultipartField]) -> ApiResult<multipart::Form> {
    let mut form = multipart::Form::new();
    for field in fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartField::File {
                name,
                filename,
                content_type,
                data,
            } => {
                let part = multipart::Part::bytes(data.clone())
                    .file_name(filename.clone())
                    .mime_str(content_type)
                    .map_err(|e| {
                        ApiError::network(format!("Invalid multipart content type: {e}"))
                    })?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

/// Normalize a failure that produced no HTTP response
fn normalize_transport_error(error: &reqwest::Error) -> ApiError {
    if error.is_timeout() {
        return ApiError::network(format!("Request timed out: {error}"));
    }
    ApiError::network(
        error
            .source()
            .map_or_else(|| UNKNOWN_ERROR_MESSAGE.to_owned(), |s| format!("{error}: {s}")),
    )
}

/// Normalize a non-2xx HTTP response into the single error shape
async fn normalize_response(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let reason = status.canonical_reason();
    let bytes = response.bytes().await.unwrap_or_default();
    let (message, data) = extract_error_payload(&bytes, reason);
    ApiError::http(status.as_u16(), message, data)
}

/// Best-effort message extraction from a failing response body
///
/// Checks, in order: plain string body, object `message` field, object
/// `error` field, the transport's own status reason, and finally the
/// network-error fallback. The raw body is preserved as `data`.
fn extract_error_payload(bytes: &[u8], reason: Option<&str>) -> (String, Option<JsonValue>) {
    let fallback = || reason.unwrap_or(NETWORK_ERROR_MESSAGE).to_owned();

    if bytes.is_empty() {
        return (fallback(), None);
    }

    match serde_json::from_slice::<JsonValue>(bytes) {
        Ok(JsonValue::String(text)) => (text.clone(), Some(JsonValue::String(text))),
        Ok(value) => {
            let message = value
                .get("message")
                .and_then(JsonValue::as_str)
                .or_else(|| value.get("error").and_then(JsonValue::as_str))
                .map_or_else(fallback, str::to_owned);
            (message, Some(value))
        }
        // Non-JSON text bodies are treated as the message itself
        Err(_) => match std::str::from_utf8(bytes) {
            Ok(text) if !text.trim().is_empty() => (
                text.trim().to_owned(),
                Some(JsonValue::String(text.to_owned())),
            ),
            _ => (fallback(), None),
        },
    }
}
