// ABOUTME: Integration tests for the silent 401 refresh-and-retry flow
// ABOUTME: Covers retry success, single-refresh guarantee, bootstrap exemption, and cleanup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value as JsonValue};

use forma_client::{RequestDescriptor, TokenKind, TokenStore};

use common::{build_client, seed_tokens, spawn_server, CallCounter};

/// Backend double simulating token expiry and refresh
struct RefreshState {
    counter: CallCounter,
    /// The only access token `/profile` currently accepts
    valid_access: Mutex<String>,
    /// The refresh token the refresh endpoint accepts
    expected_refresh: String,
    /// Access token issued by a successful refresh
    issued_access: String,
    /// Refresh token issued alongside, when rotation is enabled
    rotated_refresh: Option<String>,
    /// When true the refresh endpoint rejects every call
    fail_refresh: bool,
    /// When true `/profile` rejects every token, even freshly issued ones
    always_reject: bool,
}

impl RefreshState {
    fn unauthorized() -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Token expired" })),
        )
            .into_response()
    }
}

async fn profile(State(state): State<Arc<RefreshState>>, headers: HeaderMap) -> Response {
    state.counter.record("profile");
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let expected = format!("Bearer {}", state.valid_access.lock().unwrap());

    if !state.always_reject && authorization == expected {
        Json(json!({ "ok": true, "token": authorization })).into_response()
    } else {
        RefreshState::unauthorized()
    }
}

async fn refresh_token(
    State(state): State<Arc<RefreshState>>,
    Json(body): Json<JsonValue>,
) -> Response {
    state.counter.record("refresh");

    if state.fail_refresh || body["refresh_token"] != state.expected_refresh.as_str() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid refresh token" })),
        )
            .into_response();
    }

    // Newly issued access token becomes the only one /profile accepts
    *state.valid_access.lock().unwrap() = state.issued_access.clone();

    let mut response = json!({ "access_token": state.issued_access });
    if let Some(rotated) = &state.rotated_refresh {
        response["refresh_token"] = json!(rotated);
    }
    Json(response).into_response()
}

async fn login(State(state): State<Arc<RefreshState>>) -> Response {
    state.counter.record("login");
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid credentials" })),
    )
        .into_response()
}

fn refresh_router(state: Arc<RefreshState>) -> Router {
    Router::new()
        .route("/profile", get(profile))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/auth/login", post(login))
        .with_state(state)
}

fn refresh_state(rotate: bool, fail_refresh: bool) -> Arc<RefreshState> {
    Arc::new(RefreshState {
        counter: CallCounter::new(),
        valid_access: Mutex::new("access-2".to_owned()),
        expected_refresh: "refresh-1".to_owned(),
        issued_access: "access-2".to_owned(),
        rotated_refresh: rotate.then(|| "refresh-2".to_owned()),
        fail_refresh,
        always_reject: false,
    })
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed() {
    let state = refresh_state(false, false);
    let (base_url, _server) = spawn_server(refresh_router(Arc::clone(&state))).await;
    let (client, store) = build_client(&base_url);
    seed_tokens(&store, "stale-access", Some("refresh-1")).await;

    let descriptor = RequestDescriptor::get("profile");
    let response = client
        .execute::<JsonValue>(&descriptor, None, None)
        .await
        .unwrap();

    // The replay carried the newly issued access token
    assert_eq!(response.data["ok"], true);
    assert_eq!(response.data["token"], "Bearer access-2");

    // One refresh, two dispatches of the original request
    assert_eq!(state.counter.count("refresh"), 1);
    assert_eq!(state.counter.count("profile"), 2);

    // The new access token was persisted; the refresh token was not rotated
    assert_eq!(
        store.get_token(TokenKind::Access).await.unwrap().as_deref(),
        Some("access-2")
    );
    assert_eq!(
        store.get_token(TokenKind::Refresh).await.unwrap().as_deref(),
        Some("refresh-1")
    );
}

#[tokio::test]
async fn rotated_refresh_token_is_persisted() {
    let state = refresh_state(true, false);
    let (base_url, _server) = spawn_server(refresh_router(Arc::clone(&state))).await;
    let (client, store) = build_client(&base_url);
    seed_tokens(&store, "stale-access", Some("refresh-1")).await;

    let descriptor = RequestDescriptor::get("profile");
    client
        .execute::<JsonValue>(&descriptor, None, None)
        .await
        .unwrap();

    assert_eq!(
        store.get_token(TokenKind::Refresh).await.unwrap().as_deref(),
        Some("refresh-2")
    );
}

#[tokio::test]
async fn second_401_is_not_refreshed_again() {
    // Refresh succeeds, but the backend rejects the replayed request too;
    // the client must not attempt a second refresh.
    let state = Arc::new(RefreshState {
        counter: CallCounter::new(),
        valid_access: Mutex::new("access-2".to_owned()),
        expected_refresh: "refresh-1".to_owned(),
        issued_access: "access-2".to_owned(),
        rotated_refresh: None,
        fail_refresh: false,
        always_reject: true,
    });
    let (base_url, _server) = spawn_server(refresh_router(Arc::clone(&state))).await;
    let (client, store) = build_client(&base_url);
    seed_tokens(&store, "stale-access", Some("refresh-1")).await;

    let descriptor = RequestDescriptor::get("profile");
    let err = client
        .execute::<JsonValue>(&descriptor, None, None)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(state.counter.count("refresh"), 1, "exactly one refresh");
    assert_eq!(state.counter.count("profile"), 2, "original + single retry");
}

#[tokio::test]
async fn auth_bootstrap_401_is_never_refresh_intercepted() {
    let state = refresh_state(false, false);
    let (base_url, _server) = spawn_server(refresh_router(Arc::clone(&state))).await;
    let (client, store) = build_client(&base_url);
    seed_tokens(&store, "stale-access", Some("refresh-1")).await;

    let descriptor = RequestDescriptor::post("auth/login");
    let err = client
        .execute::<JsonValue>(&descriptor, None, None)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "Invalid credentials");
    assert_eq!(state.counter.count("refresh"), 0);
    // Tokens survive a bootstrap failure untouched
    assert_eq!(
        store.get_token(TokenKind::Refresh).await.unwrap().as_deref(),
        Some("refresh-1")
    );
}

#[tokio::test]
async fn missing_refresh_token_clears_store_and_returns_original_401() {
    let state = refresh_state(false, false);
    let (base_url, _server) = spawn_server(refresh_router(Arc::clone(&state))).await;
    let (client, store) = build_client(&base_url);
    // Access token only; nothing to refresh with
    seed_tokens(&store, "stale-access", None).await;

    let descriptor = RequestDescriptor::get("profile");
    let err = client
        .execute::<JsonValue>(&descriptor, None, None)
        .await
        .unwrap_err();

    // The original 401, not a refresh-path error
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "Token expired");
    assert_eq!(state.counter.count("refresh"), 0);

    // Stored tokens were cleared
    assert_eq!(store.get_token(TokenKind::Access).await.unwrap(), None);
    assert_eq!(store.get_token(TokenKind::Refresh).await.unwrap(), None);
}

#[tokio::test]
async fn failed_refresh_clears_store_and_returns_original_401() {
    let state = refresh_state(false, true);
    let (base_url, _server) = spawn_server(refresh_router(Arc::clone(&state))).await;
    let (client, store) = build_client(&base_url);
    seed_tokens(&store, "stale-access", Some("refresh-1")).await;

    let descriptor = RequestDescriptor::get("profile");
    let err = client
        .execute::<JsonValue>(&descriptor, None, None)
        .await
        .unwrap_err();

    // Callers see the original failure, never the refresh endpoint's
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "Token expired");
    assert_eq!(state.counter.count("refresh"), 1);
    assert_eq!(state.counter.count("profile"), 1, "no replay happened");

    assert_eq!(store.get_token(TokenKind::Access).await.unwrap(), None);
    assert_eq!(store.get_token(TokenKind::Refresh).await.unwrap(), None);
}
