// ABOUTME: Workout planning endpoints for plan retrieval, generation, and session logging
// ABOUTME: Typed DTOs over the backend's opaque plan-generation service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Workout endpoints
//!
//! Plan generation runs server-side; this module only shapes the request and
//! decodes the resulting plan.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::errors::ApiResult;
use crate::models::{RequestBody, RequestDescriptor, RequestOptions};

/// Training goal driving plan generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingGoal {
    /// Maximal strength focus
    Strength,
    /// Muscle growth focus
    Hypertrophy,
    /// Aerobic capacity focus
    Endurance,
    /// Caloric-deficit support focus
    WeightLoss,
}

/// Self-reported training experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// Under one year of consistent training
    Beginner,
    /// One to three years
    Intermediate,
    /// Three or more years
    Advanced,
}

/// One prescribed exercise within a plan day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedExercise {
    /// Catalog identifier of the exercise
    pub exercise_id: Uuid,
    /// Display name
    pub name: String,
    /// Prescribed set count
    pub sets: u32,
    /// Prescribed repetitions per set
    pub reps: u32,
    /// Rest between sets, in seconds
    pub rest_secs: u32,
}

/// One training day within a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDay {
    /// Day of week, 1 = Monday
    pub day_of_week: u8,
    /// Focus label, e.g. "Upper push"
    pub focus: String,
    /// Exercises in prescribed order
    pub exercises: Vec<PlannedExercise>,
}

/// A generated workout plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Plan identifier
    pub id: Uuid,
    /// Plan name assigned by the backend
    pub name: String,
    /// Goal the plan was generated for
    pub goal: TrainingGoal,
    /// Plan length in weeks
    pub weeks: u32,
    /// Training days
    pub days: Vec<WorkoutDay>,
}

/// Request for server-side plan generation
#[derive(Debug, Clone, Serialize)]
pub struct PlanGenerationRequest {
    /// Training goal
    pub goal: TrainingGoal,
    /// Desired training days per week
    pub days_per_week: u8,
    /// Self-reported experience level
    pub experience: ExperienceLevel,
}

/// One performed set within a logged session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetEntry {
    /// Exercise performed
    pub exercise_id: Uuid,
    /// Set ordinal within the exercise, 1-based
    pub set_number: u32,
    /// Repetitions completed
    pub reps: u32,
    /// Load used, in kilograms
    pub weight_kg: f64,
}

/// A completed workout session to log
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSessionLog {
    /// Plan the session belongs to
    pub plan_id: Uuid,
    /// When the session was performed
    pub performed_at: DateTime<Utc>,
    /// Performed sets
    pub entries: Vec<SetEntry>,
}

/// Server acknowledgment of a logged session
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutSessionSummary {
    /// Identifier of the stored session
    pub id: Uuid,
    /// When the session was performed
    pub performed_at: DateTime<Utc>,
    /// Total volume across all sets, in kilograms
    pub total_volume_kg: f64,
}

/// One entry of the exercise catalog
#[derive(Debug, Clone, Deserialize)]
pub struct Exercise {
    /// Catalog identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Primary muscle group
    pub muscle_group: String,
    /// Required equipment, empty for bodyweight movements
    pub equipment: Option<String>,
}

/// Paginated exercise catalog response
#[derive(Debug, Clone, Deserialize)]
pub struct ExercisePage {
    /// Matching exercises
    pub exercises: Vec<Exercise>,
    /// Current page, 1-based
    pub page: u32,
    /// Total pages available
    pub total_pages: u32,
}

/// Workout endpoint wrapper
#[derive(Clone)]
pub struct WorkoutsApi {
    client: Arc<ApiClient>,
}

impl WorkoutsApi {
    /// Bind the workout endpoints to a session client
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch the user's active plan
    ///
    /// # Errors
    /// Returns an error if no plan exists or the request fails
    pub async fn current_plan(&self) -> ApiResult<WorkoutPlan> {
        let descriptor = RequestDescriptor::get("workouts/plan");
        let response = self.client.execute(&descriptor, None, None).await?;
        Ok(response.data)
    }

    /// Request generation of a new plan
    ///
    /// # Errors
    /// Returns an error if generation is rejected or the request fails
    pub async fn generate_plan(&self, request: &PlanGenerationRequest) -> ApiResult<WorkoutPlan> {
        let descriptor = RequestDescriptor::post("workouts/plan/generate");
        let response = self
            .client
            .execute(&descriptor, Some(RequestBody::json(request)?), None)
            .await?;
        Ok(response.data)
    }

    /// Log a completed workout session
    ///
    /// # Errors
    /// Returns an error if the log is rejected or the request fails
    pub async fn log_session(&self, log: &WorkoutSessionLog) -> ApiResult<WorkoutSessionSummary> {
        let descriptor = RequestDescriptor::post("workouts/sessions");
        let response = self
            .client
            .execute(&descriptor, Some(RequestBody::json(log)?), None)
            .await?;
        Ok(response.data)
    }

    /// Search the exercise catalog
    ///
    /// # Errors
    /// Returns an error if the request fails
    pub async fn list_exercises(&self, search: Option<&str>, page: u32) -> ApiResult<ExercisePage> {
        let descriptor = RequestDescriptor::get("workouts/exercises");
        let mut query = vec![("page".to_owned(), page.to_string())];
        if let Some(term) = search {
            query.push(("search".to_owned(), term.to_owned()));
        }
        let response = self
            .client
            .execute(&descriptor, None, Some(RequestOptions { query }))
            .await?;
        Ok(response.data)
    }
}
