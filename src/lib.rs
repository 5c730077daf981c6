// ABOUTME: Main library entry point for the Forma fitness platform client SDK
// ABOUTME: Exposes the HTTP session client, token storage port, and typed API modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

#![deny(unsafe_code)]

//! # Forma Client
//!
//! Rust client SDK for the Forma fitness-coaching platform. The crate owns
//! the HTTP session layer the Forma mobile and CLI hosts talk through:
//! request dispatch, JSON/multipart content negotiation, bearer-token
//! attachment from a pluggable secure store, and a silent refresh-and-retry
//! flow when an access token expires.
//!
//! ## Architecture
//!
//! - **Client**: the session client; single choke point for outbound calls
//! - **Token store**: async port over the host's secure credential storage
//! - **Errors**: one normalized error shape for every failure path
//! - **API**: typed endpoint modules (auth, workouts, nutrition, messaging,
//!   mindfulness) that call exclusively through the client
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use forma_client::api::auth::{AuthApi, LoginRequest};
//! use forma_client::client::ApiClient;
//! use forma_client::config::ClientConfig;
//! use forma_client::token_store::MemoryTokenStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("https://api.forma.fit/v1")?;
//! let client = Arc::new(ApiClient::new(config, Arc::new(MemoryTokenStore::new()))?);
//!
//! let auth = AuthApi::new(Arc::clone(&client));
//! let login = auth
//!     .login(&LoginRequest {
//!         email: "client@forma.fit".to_owned(),
//!         password: "secret".to_owned(),
//!     })
//!     .await?;
//! println!("logged in as {}", login.user.email);
//! # Ok(())
//! # }
//! ```

/// HTTP session client with bearer auth and silent token refresh
pub mod client;

/// Client configuration and environment loading
pub mod config;

/// Unified error handling with the single normalized error shape
pub mod errors;

/// Tracing subscriber initialization for hosts
pub mod logging;

/// Request/response data model consumed by the session client
pub mod models;

/// Secure token storage port and bundled adapters
pub mod token_store;

/// Typed endpoint modules for the Forma REST API
pub mod api;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use errors::{ApiError, ApiResult};
pub use models::{
    ApiResponse, HttpMethod, MultipartField, RequestBody, RequestDescriptor, RequestOptions,
    TokenPair,
};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenKind, TokenStore};
