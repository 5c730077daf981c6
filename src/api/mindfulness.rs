// ABOUTME: Mindfulness endpoints for mood check-ins and session tracking
// ABOUTME: Weekly aggregation is computed server-side
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Mindfulness endpoints

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::errors::ApiResult;
use crate::models::{RequestBody, RequestDescriptor};

/// Kind of mindfulness session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Guided or unguided meditation
    Meditation,
    /// Breathing exercise
    Breathing,
    /// Sleep story or wind-down session
    Sleep,
}

/// Mood check-in, on a 1 (low) to 5 (high) scale
#[derive(Debug, Clone, Serialize)]
pub struct MoodCheckIn {
    /// Mood rating, 1 to 5
    pub mood: u8,
    /// Optional free-text note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// When the check-in was made
    pub recorded_at: DateTime<Utc>,
}

/// Stored mood check-in
#[derive(Debug, Clone, Deserialize)]
pub struct MoodCheckInRecord {
    /// Record identifier
    pub id: Uuid,
    /// Mood rating, 1 to 5
    pub mood: u8,
    /// Free-text note if one was given
    pub note: Option<String>,
    /// When the check-in was made
    pub recorded_at: DateTime<Utc>,
}

/// Completed mindfulness session to log
#[derive(Debug, Clone, Serialize)]
pub struct MindfulnessSessionLog {
    /// Session kind
    pub kind: SessionKind,
    /// Session length, in seconds
    pub duration_secs: u32,
    /// When the session finished
    pub completed_at: DateTime<Utc>,
}

/// Stored mindfulness session
#[derive(Debug, Clone, Deserialize)]
pub struct MindfulnessSessionRecord {
    /// Record identifier
    pub id: Uuid,
    /// Session kind
    pub kind: SessionKind,
    /// Session length, in seconds
    pub duration_secs: u32,
    /// When the session finished
    pub completed_at: DateTime<Utc>,
}

/// Server-computed weekly mindfulness summary
#[derive(Debug, Clone, Deserialize)]
pub struct WeeklyMindfulnessSummary {
    /// Sessions completed this week
    pub sessions: u32,
    /// Total mindfulness minutes this week
    pub total_minutes: u32,
    /// Average mood across the week's check-ins, when any exist
    pub average_mood: Option<f64>,
}

/// Mindfulness endpoint wrapper
#[derive(Clone)]
pub struct MindfulnessApi {
    client: Arc<ApiClient>,
}

impl MindfulnessApi {
    /// Bind the mindfulness endpoints to a session client
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Record a mood check-in
    ///
    /// # Errors
    /// Returns an error if the check-in is rejected or the request fails
    pub async fn log_check_in(&self, check_in: &MoodCheckIn) -> ApiResult<MoodCheckInRecord> {
        let descriptor = RequestDescriptor::post("mindfulness/check-ins");
        let response = self
            .client
            .execute(&descriptor, Some(RequestBody::json(check_in)?), None)
            .await?;
        Ok(response.data)
    }

    /// Log a completed mindfulness session
    ///
    /// # Errors
    /// Returns an error if the log is rejected or the request fails
    pub async fn log_session(
        &self,
        log: &MindfulnessSessionLog,
    ) -> ApiResult<MindfulnessSessionRecord> {
        let descriptor = RequestDescriptor::post("mindfulness/sessions");
        let response = self
            .client
            .execute(&descriptor, Some(RequestBody::json(log)?), None)
            .await?;
        Ok(response.data)
    }

    /// Fetch the current week's summary
    ///
    /// # Errors
    /// Returns an error if the request fails
    pub async fn weekly_summary(&self) -> ApiResult<WeeklyMindfulnessSummary> {
        let descriptor = RequestDescriptor::get("mindfulness/summary/weekly");
        let response = self.client.execute(&descriptor, None, None).await?;
        Ok(response.data)
    }
}
