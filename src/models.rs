// ABOUTME: Request and response types consumed by the HTTP session client
// ABOUTME: Defines descriptors, bodies, options, and the token pair owned by secure storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Core request/response data model
//!
//! These types are short-lived: a [`RequestDescriptor`] is constructed fresh
//! per call by endpoint helpers and consumed by
//! [`ApiClient::execute`](crate::client::ApiClient::execute). Nothing here
//! persists beyond a single request lifecycle except the [`TokenPair`],
//! which is owned by the token store.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;

use crate::errors::{ApiError, ApiResult};

/// The five HTTP verbs the client supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP PATCH
    Patch,
    /// HTTP DELETE
    Delete,
}

impl HttpMethod {
    /// Canonical uppercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether a request body is honored for this verb
    ///
    /// Bodies supplied with GET or DELETE are silently dropped, matching the
    /// upstream API contract.
    #[must_use]
    pub const fn allows_body(self) -> bool {
        !matches!(self, Self::Get | Self::Delete)
    }

    /// Corresponding transport-level method
    #[must_use]
    pub const fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    /// Case-insensitive parse; anything outside the five verbs is rejected
    /// before any I/O happens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ApiError::unsupported_method(s)),
        }
    }
}

/// Target of a single API call
///
/// Produced by the endpoint modules in [`crate::api`]; immutable once built.
/// The URL is either relative to the configured base URL or absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Endpoint path (relative to the base URL) or absolute URL
    pub url: String,
    /// HTTP verb, validated case-insensitively at dispatch time
    pub method: String,
}

impl RequestDescriptor {
    /// Build a descriptor with an explicit method string
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
        }
    }

    /// GET descriptor
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// POST descriptor
    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    /// PUT descriptor
    pub fn put(url: impl Into<String>) -> Self {
        Self::new("PUT", url)
    }

    /// PATCH descriptor
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new("PATCH", url)
    }

    /// DELETE descriptor
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new("DELETE", url)
    }
}

/// One field of a multipart form payload
#[derive(Debug, Clone)]
pub enum MultipartField {
    /// Plain text field
    Text {
        /// Form field name
        name: String,
        /// Field value
        value: String,
    },
    /// Binary file field
    File {
        /// Form field name
        name: String,
        /// Filename reported to the server
        filename: String,
        /// MIME type of the content
        content_type: String,
        /// File bytes
        data: Vec<u8>,
    },
}

/// Request body accepted by the client
///
/// Kept as owned data (rather than a transport form) so a 401-triggered
/// retry can rebuild the outbound request from the same payload.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// JSON payload; explicitly serialized to a string before dispatch
    Json(JsonValue),
    /// Multipart form payload; the transport sets the boundary header itself
    Multipart(Vec<MultipartField>),
    /// Raw bytes, passed through unmodified
    Raw(Vec<u8>),
}

impl RequestBody {
    /// Serialize any `Serialize` value into a JSON body
    ///
    /// # Errors
    /// Returns a network-class error if the value cannot be represented as JSON
    pub fn json<T: Serialize>(value: &T) -> ApiResult<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| ApiError::network(format!("Failed to serialize request body: {e}")))
    }
}

/// Per-request options passed through to the transport
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query string parameters, appended verbatim
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options carrying only query parameters
    #[must_use]
    pub fn with_query<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            query: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Success envelope returned by `execute`
///
/// `T` is the caller-specified expected shape; no runtime validation beyond
/// deserialization is performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    /// Decoded response body
    pub data: T,
}

/// Access/refresh token pair as returned by the auth endpoints
///
/// The refresh token is long-lived and may not be rotated on every refresh,
/// so it is optional in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer credential sent with every authenticated request
    pub access_token: String,
    /// Longer-lived credential exchanged for new access tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}
