// ABOUTME: Tracing subscriber initialization for binary and demo hosts
// ABOUTME: Library code only emits events; hosts decide whether anything is printed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Logging setup
//!
//! The client emits structured `tracing` events (including the per-request
//! `[API Request]` debug line) but never installs a subscriber on its own;
//! without one, every event is a no-op, which is the production default for
//! embedded use. Hosts that want output call [`init`] once at startup.
//!
//! Token values are never logged at any level.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset: library debug, dependencies warn
const DEFAULT_FILTER: &str = "warn,forma_client=debug";

/// Install a formatted subscriber honoring `RUST_LOG`
///
/// Falls back to showing this crate's debug-level request log when `RUST_LOG`
/// is unset. Calling it twice is a no-op: the second installation attempt is
/// discarded.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Install a formatted subscriber with an explicit filter directive
///
/// Used by hosts that manage verbosity themselves rather than through the
/// environment.
pub fn init_with_filter(directives: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .try_init();
}
