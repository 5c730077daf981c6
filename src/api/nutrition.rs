// ABOUTME: Nutrition endpoints for food search, meal logging, and daily summaries
// ABOUTME: Nutrient computation stays server-side; this module shapes requests and decodes results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Nutrition endpoints

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::errors::ApiResult;
use crate::models::{RequestBody, RequestDescriptor, RequestOptions};

/// Meal slot a food entry is logged against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// Anything between meals
    Snack,
}

/// One food item from the search catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    /// Catalog identifier
    pub id: Uuid,
    /// Food description
    pub name: String,
    /// Brand owner, for branded foods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Energy per serving, kcal
    pub calories: f64,
    /// Protein per serving, grams
    pub protein_g: f64,
    /// Carbohydrate per serving, grams
    pub carbs_g: f64,
    /// Fat per serving, grams
    pub fat_g: f64,
    /// Serving size in `serving_unit`
    pub serving_size: f64,
    /// Unit of measurement for the serving size
    pub serving_unit: String,
}

/// Paginated food search response
#[derive(Debug, Clone, Deserialize)]
pub struct FoodSearchPage {
    /// Matching foods
    pub foods: Vec<FoodItem>,
    /// Total number of matching foods
    pub total_hits: u32,
    /// Current page, 1-based
    pub current_page: u32,
    /// Total pages available
    pub total_pages: u32,
}

/// Request to log a food entry
#[derive(Debug, Clone, Serialize)]
pub struct MealLogRequest {
    /// Food being logged
    pub food_id: Uuid,
    /// Number of servings consumed
    pub quantity: f64,
    /// Meal slot
    pub meal: MealSlot,
    /// When the food was consumed
    pub logged_at: DateTime<Utc>,
}

/// A stored meal log entry
#[derive(Debug, Clone, Deserialize)]
pub struct LoggedMeal {
    /// Entry identifier
    pub id: Uuid,
    /// Food that was logged
    pub food: FoodItem,
    /// Number of servings
    pub quantity: f64,
    /// Meal slot
    pub meal: MealSlot,
    /// When the food was consumed
    pub logged_at: DateTime<Utc>,
}

/// Computed daily nutrition totals
#[derive(Debug, Clone, Deserialize)]
pub struct DailyNutritionSummary {
    /// Day the summary covers
    pub date: NaiveDate,
    /// Total energy, kcal
    pub calories: f64,
    /// Total protein, grams
    pub protein_g: f64,
    /// Total carbohydrate, grams
    pub carbs_g: f64,
    /// Total fat, grams
    pub fat_g: f64,
    /// Entries contributing to the totals
    pub meals: Vec<LoggedMeal>,
}

/// Nutrition endpoint wrapper
#[derive(Clone)]
pub struct NutritionApi {
    client: Arc<ApiClient>,
}

impl NutritionApi {
    /// Bind the nutrition endpoints to a session client
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Search foods by free-text query with pagination
    ///
    /// # Errors
    /// Returns an error if the request fails
    pub async fn search_foods(
        &self,
        query: &str,
        page_size: u32,
        page: u32,
    ) -> ApiResult<FoodSearchPage> {
        let descriptor = RequestDescriptor::get("nutrition/foods/search");
        let options = RequestOptions::with_query([
            ("query", query.to_owned()),
            ("page_size", page_size.to_string()),
            ("page", page.to_string()),
        ]);
        let response = self.client.execute(&descriptor, None, Some(options)).await?;
        Ok(response.data)
    }

    /// Log a food entry
    ///
    /// # Errors
    /// Returns an error if the entry is rejected or the request fails
    pub async fn log_meal(&self, request: &MealLogRequest) -> ApiResult<LoggedMeal> {
        let descriptor = RequestDescriptor::post("nutrition/meals");
        let response = self
            .client
            .execute(&descriptor, Some(RequestBody::json(request)?), None)
            .await?;
        Ok(response.data)
    }

    /// Remove a logged entry
    ///
    /// # Errors
    /// Returns an error if the entry does not exist or the request fails
    pub async fn delete_meal(&self, entry_id: Uuid) -> ApiResult<()> {
        let descriptor = RequestDescriptor::delete(format!("nutrition/meals/{entry_id}"));
        self.client.execute::<()>(&descriptor, None, None).await?;
        Ok(())
    }

    /// Fetch the computed nutrition summary for one day
    ///
    /// # Errors
    /// Returns an error if the request fails
    pub async fn daily_summary(&self, date: NaiveDate) -> ApiResult<DailyNutritionSummary> {
        let descriptor = RequestDescriptor::get("nutrition/summary");
        let options = RequestOptions::with_query([("date", date.to_string())]);
        let response = self.client.execute(&descriptor, None, Some(options)).await?;
        Ok(response.data)
    }
}
