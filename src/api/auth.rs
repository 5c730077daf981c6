// ABOUTME: Auth session endpoints for registration, login, logout, and session introspection
// ABOUTME: Persists issued token pairs through the client's token store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Authentication endpoints
//!
//! Login and registration are auth-bootstrap endpoints: a 401 from them is
//! surfaced directly rather than triggering the refresh interceptor. On a
//! successful login the issued token pair is written to the client's token
//! store so subsequent requests authenticate automatically.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::errors::ApiResult;
use crate::models::{RequestBody, RequestDescriptor};
use crate::token_store::TokenKind;

/// Account role within the coaching platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Coached user
    Client,
    /// Coach with assigned clients
    Coach,
}

/// User registration request
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// User's email address
    pub email: String,
    /// User's password
    pub password: String,
    /// Optional display name for the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Role requested at signup
    pub role: UserRole,
}

/// User registration response
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    /// Unique identifier for the newly created user
    pub user_id: Uuid,
    /// Human-readable status message
    pub message: String,
}

/// User login request
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// User's email address
    pub email: String,
    /// User's password
    pub password: String,
}

/// Profile data embedded in session responses
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    /// Unique identifier for the user
    pub id: Uuid,
    /// User's email address
    pub email: String,
    /// Display name if set
    pub display_name: Option<String>,
    /// Account role
    pub role: UserRole,
}

/// Login response carrying the issued token pair
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Short-lived bearer credential
    pub access_token: String,
    /// Long-lived refresh credential
    pub refresh_token: String,
    /// Authenticated user profile
    pub user: UserProfile,
}

/// Current session introspection response
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    /// Authenticated user profile
    pub user: UserProfile,
    /// When the current access token expires
    pub expires_at: DateTime<Utc>,
}

/// Authentication endpoint wrapper
#[derive(Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    /// Bind the auth endpoints to a session client
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Register a new account
    ///
    /// # Errors
    /// Returns an error if registration is rejected or the request fails
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisterResponse> {
        let descriptor = RequestDescriptor::post("auth/register");
        let response = self
            .client
            .execute(&descriptor, Some(RequestBody::json(request)?), None)
            .await?;
        Ok(response.data)
    }

    /// Log in and persist the issued token pair
    ///
    /// # Errors
    /// Returns an error on invalid credentials (surfaced directly, never
    /// refresh-retried) or if token persistence fails
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let descriptor = RequestDescriptor::post("auth/login");
        let response = self
            .client
            .execute::<LoginResponse>(&descriptor, Some(RequestBody::json(request)?), None)
            .await?;

        let login = response.data;
        let tokens = self.client.tokens();
        tokens
            .set_token(TokenKind::Access, &login.access_token)
            .await?;
        tokens
            .set_token(TokenKind::Refresh, &login.refresh_token)
            .await?;

        Ok(login)
    }

    /// Log out and clear stored credentials
    ///
    /// The server-side logout call is best effort: local tokens are cleared
    /// even when the network call fails, so the device never keeps
    /// credentials for a session the user asked to end.
    ///
    /// # Errors
    /// Returns an error only if clearing the token store fails
    pub async fn logout(&self) -> ApiResult<()> {
        let descriptor = RequestDescriptor::post("auth/logout");
        if let Err(e) = self
            .client
            .execute::<serde_json::Value>(&descriptor, None, None)
            .await
        {
            debug!("Server-side logout failed, clearing local tokens anyway: {e}");
        }
        self.client.tokens().clear_tokens().await
    }

    /// Fetch the current session
    ///
    /// # Errors
    /// Returns an error if unauthenticated or the request fails
    pub async fn session(&self) -> ApiResult<SessionResponse> {
        let descriptor = RequestDescriptor::get("auth/session");
        let response = self.client.execute(&descriptor, None, None).await?;
        Ok(response.data)
    }
}
