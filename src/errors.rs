// ABOUTME: Unified error handling for the Forma API client
// ABOUTME: Defines the single normalized error shape surfaced by every request path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Normalized client errors
//!
//! Every failure that leaves this crate (transport breakdown, non-2xx
//! response, or an invalid request that never reaches the wire) is expressed
//! as an [`ApiError`]. Callers branch on [`ApiError::status`]: `401` means
//! the client already attempted and failed silent token refresh, other `4xx`
//! carry a server-provided message, and `0` means no response was received.

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result type alias for all client operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Fallback message when an HTTP failure carries no usable body or reason
pub(crate) const NETWORK_ERROR_MESSAGE: &str = "Network error";

/// Fallback message for failures with no response and no transport detail
pub(crate) const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// The single error shape exposed by the client
///
/// This is a closed union: every call site can match exhaustively on the
/// three observable failure classes. A refresh-path failure is never a
/// variant here: it is swallowed internally and the original `401`
/// propagates instead.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request used a verb outside GET/POST/PUT/PATCH/DELETE; no I/O was performed
    #[error("Unsupported HTTP method: {method}")]
    UnsupportedMethod {
        /// The rejected method string, as the caller supplied it
        method: String,
    },

    /// Server responded with a non-2xx status
    #[error("{message}")]
    Http {
        /// HTTP status code of the failing response
        status: u16,
        /// Best-effort human-readable message extracted from the response
        message: String,
        /// Raw response body, when one was present
        data: Option<JsonValue>,
    },

    /// No response was received (timeout, DNS, connectivity, or unexpected failure)
    #[error("{message}")]
    Network {
        /// Best available description of the failure
        message: String,
    },
}

impl ApiError {
    /// Build an error for an unsupported HTTP verb
    pub fn unsupported_method(method: impl Into<String>) -> Self {
        Self::UnsupportedMethod {
            method: method.into(),
        }
    }

    /// Build an error from a non-2xx HTTP response
    pub fn http(status: u16, message: impl Into<String>, data: Option<JsonValue>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            data,
        }
    }

    /// Build an error for a failure with no HTTP response
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Status code for caller branching
    ///
    /// `Some(0)` for network-class failures (no response received), `None`
    /// when the request was rejected before any I/O.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnsupportedMethod { .. } => None,
            Self::Http { status, .. } => Some(*status),
            Self::Network { .. } => Some(0),
        }
    }

    /// Human-readable message for this failure
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Raw response body attached to an HTTP failure, if any
    #[must_use]
    pub const fn data(&self) -> Option<&JsonValue> {
        match self {
            Self::Http { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    /// True when this failure is an authentication rejection (HTTP 401)
    ///
    /// By the time callers observe this, the client has already attempted
    /// and failed silent token refresh; the application should force
    /// re-authentication rather than retry.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unsupported_method_has_no_status() {
        let err = ApiError::unsupported_method("TRACE");
        assert_eq!(err.status(), None);
        assert_eq!(err.message(), "Unsupported HTTP method: TRACE");
        assert!(err.data().is_none());
    }

    #[test]
    fn http_error_carries_status_and_data() {
        let body = json!({"error": "Not found"});
        let err = ApiError::http(404, "Not found", Some(body.clone()));
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "Not found");
        assert_eq!(err.data(), Some(&body));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn network_error_reports_status_zero() {
        let err = ApiError::network("connection refused");
        assert_eq!(err.status(), Some(0));
        assert!(err.data().is_none());
    }

    #[test]
    fn unauthorized_detection() {
        assert!(ApiError::http(401, "Token expired", None).is_unauthorized());
        assert!(!ApiError::network("timeout").is_unauthorized());
    }
}
