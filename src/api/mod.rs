// ABOUTME: Typed endpoint modules for the Forma REST API surface
// ABOUTME: Thin serialization layers that call exclusively through the session client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Typed API surface
//!
//! Each module wraps one area of the Forma backend (auth sessions, workout
//! planning, nutrition logging, coach-client messaging, mindfulness) as a
//! fully typed layer over [`ApiClient::execute`](crate::client::ApiClient::execute).
//! The backend's algorithms (plan generation, nutrition computation) are
//! opaque to this crate: these modules serialize requests and deserialize
//! responses, nothing more.

/// Session endpoints: register, login, logout, session introspection
pub mod auth;

/// Workout planning and session logging
pub mod workouts;

/// Food search, meal logging, and daily nutrition summaries
pub mod nutrition;

/// Coach-client conversations and attachments
pub mod messaging;

/// Mood check-ins and mindfulness session tracking
pub mod mindfulness;
