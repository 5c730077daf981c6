// ABOUTME: Client configuration with environment-first loading and defaults
// ABOUTME: Owns base URL normalization and the transport timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Client configuration
//!
//! The client is explicitly constructed from a [`ClientConfig`] rather than
//! reading ambient global state, so hosts (and tests) can run several
//! differently-configured clients side by side. `from_env` follows the
//! environment-first convention used across Forma deployments.

use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable naming the API base URL
pub const ENV_BASE_URL: &str = "FORMA_BASE_URL";

/// Environment variable overriding the request timeout, in seconds
pub const ENV_TIMEOUT_SECS: &str = "FORMA_TIMEOUT_SECS";

/// Default transport timeout applied to every primary request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while assembling a [`ClientConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is not set
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    /// Base URL could not be parsed
    #[error("Invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// The offending value
        url: String,
        /// Parse failure detail
        #[source]
        source: url::ParseError,
    },
    /// Timeout override was not a positive integer
    #[error("Invalid FORMA_TIMEOUT_SECS value {0:?}: expected a positive integer")]
    InvalidTimeout(String),
}

/// Configuration consumed by [`ApiClient`](crate::client::ApiClient) at startup
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, always ending in `/` so relative paths concatenate
    pub base_url: String,
    /// Transport timeout for primary requests
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a configuration with the default timeout
    ///
    /// The base URL is normalized to end with a trailing slash.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL does not parse
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = base_url.into();
        Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl {
            url: raw.clone(),
            source,
        })?;

        let base_url = if raw.ends_with('/') {
            raw
        } else {
            format!("{raw}/")
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Override the transport timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from the environment
    ///
    /// Reads `FORMA_BASE_URL` (required) and `FORMA_TIMEOUT_SECS` (optional,
    /// defaults to 30).
    ///
    /// # Errors
    /// Returns an error if the base URL is missing or invalid, or if the
    /// timeout override is not a positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var(ENV_BASE_URL).map_err(|_| ConfigError::MissingVar(ENV_BASE_URL))?;
        let mut config = Self::new(base_url)?;

        if let Ok(raw) = env::var(ENV_TIMEOUT_SECS) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
