// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Provides logging setup, local test server spawning, and client construction helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code, missing_docs)]

//! Shared test utilities for `forma_client`
//!
//! Integration tests drive the real client against a local axum server bound
//! to an ephemeral port, so the full transport path (serialization, headers,
//! refresh flow) is exercised without any mocking inside the crate.

use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use axum::Router;
use tokio::task::JoinHandle;

use forma_client::{ApiClient, ClientConfig, MemoryTokenStore, TokenKind, TokenStore};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG environment variable controls test logging level
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Spawn a test backend on an ephemeral port
///
/// Returns the base URL (with trailing slash) and the server task handle.
/// The server lives until the handle is dropped at the end of the test.
pub async fn spawn_server(router: Router) -> (String, JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no local addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server failed");
    });

    (format!("http://{addr}/"), handle)
}

/// Build a client with an in-memory token store against a test base URL
pub fn build_client(base_url: &str) -> (Arc<ApiClient>, Arc<MemoryTokenStore>) {
    init_test_logging();
    let store = Arc::new(MemoryTokenStore::new());
    let config = ClientConfig::new(base_url)
        .expect("Invalid test base URL")
        .with_timeout(Duration::from_secs(5));
    let client = Arc::new(
        ApiClient::new(config, Arc::clone(&store) as Arc<dyn TokenStore>)
            .expect("Failed to build test client"),
    );
    (client, store)
}

/// Seed the store with an access/refresh pair
pub async fn seed_tokens(store: &MemoryTokenStore, access: &str, refresh: Option<&str>) {
    store.set_token(TokenKind::Access, access).await.unwrap();
    if let Some(refresh) = refresh {
        store.set_token(TokenKind::Refresh, refresh).await.unwrap();
    }
}

/// Thread-safe per-route call counter shared with test server handlers
#[derive(Debug, Default, Clone)]
pub struct CallCounter {
    counts: Arc<Mutex<HashMap<String, usize>>>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, key: &str) {
        *self.counts.lock().unwrap().entry(key.to_owned()).or_insert(0) += 1;
    }

    pub fn count(&self, key: &str) -> usize {
        self.counts.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.lock().unwrap().values().sum()
    }
}
