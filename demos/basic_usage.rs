// ABOUTME: End-to-end demo driving login, plan fetch, and a mood check-in
// ABOUTME: Reads FORMA_BASE_URL plus demo credentials from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Basic usage demo
//!
//! ```sh
//! FORMA_BASE_URL=https://api.forma.fit/v1 \
//! FORMA_DEMO_EMAIL=client@forma.fit \
//! FORMA_DEMO_PASSWORD=secret \
//! cargo run --example basic_usage
//! ```

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;

use forma_client::api::auth::{AuthApi, LoginRequest};
use forma_client::api::mindfulness::{MindfulnessApi, MoodCheckIn};
use forma_client::api::workouts::WorkoutsApi;
use forma_client::{ApiClient, ClientConfig, FileTokenStore};

#[tokio::main]
async fn main() -> Result<()> {
    forma_client::logging::init();

    let config = ClientConfig::from_env().context("set FORMA_BASE_URL to run this demo")?;
    let store = Arc::new(FileTokenStore::new(FileTokenStore::default_path()));
    let client = Arc::new(ApiClient::new(config, store)?);

    let auth = AuthApi::new(Arc::clone(&client));
    let login = auth
        .login(&LoginRequest {
            email: env::var("FORMA_DEMO_EMAIL").context("FORMA_DEMO_EMAIL not set")?,
            password: env::var("FORMA_DEMO_PASSWORD").context("FORMA_DEMO_PASSWORD not set")?,
        })
        .await?;
    println!("logged in as {} ({:?})", login.user.email, login.user.role);

    match WorkoutsApi::new(Arc::clone(&client)).current_plan().await {
        Ok(plan) => println!("active plan: {} ({} weeks)", plan.name, plan.weeks),
        Err(e) => println!("no active plan: {e}"),
    }

    let check_in = MindfulnessApi::new(Arc::clone(&client))
        .log_check_in(&MoodCheckIn {
            mood: 4,
            note: Some("demo check-in".to_owned()),
            recorded_at: Utc::now(),
        })
        .await?;
    println!("recorded mood check-in {}", check_in.id);

    auth.logout().await?;
    println!("logged out, tokens cleared");

    Ok(())
}
