// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity logging and listing routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Activity, Category};
use crate::time_utils::{format_utc_rfc3339, week_of};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", post(log_activity).get(get_activities))
        .route("/api/activities/categories", get(get_categories))
        .route("/api/activities/{id}", delete(delete_activity))
}

// ─── Logging ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LogActivityRequest {
    pub category: Category,
    /// Key into the emission catalog
    pub activity: String,
}

#[derive(Serialize)]
pub struct LogActivityResponse {
    pub message: String,
    pub activity: Activity,
}

/// Log a new activity.
///
/// The CO2 estimate is resolved from the catalog and the week/year key is
/// derived from the timestamp here, exactly once; every later aggregate
/// reads these stored values.
async fn log_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<LogActivityRequest>,
) -> Result<(StatusCode, Json<LogActivityResponse>)> {
    let factor = state
        .catalog
        .lookup(payload.category, &payload.activity)
        .ok_or_else(|| AppError::BadRequest("Invalid category or activity".to_string()))?;

    let now = chrono::Utc::now();
    let (week, year) = week_of(now);

    let activity = Activity {
        id: format!("{}-{}", user.user_id, now.timestamp_micros()),
        user_id: user.user_id.clone(),
        category: payload.category,
        activity_key: payload.activity,
        activity_label: factor.label.clone(),
        co2_kg: factor.co2_kg,
        occurred_at: format_utc_rfc3339(now),
        week,
        year,
    };

    state.db.set_activity(&activity).await?;

    tracing::info!(
        user_id = %user.user_id,
        category = %activity.category,
        co2_kg = activity.co2_kg,
        week,
        year,
        "Activity logged"
    );

    Ok((
        StatusCode::CREATED,
        Json(LogActivityResponse {
            message: "Activity added successfully".to_string(),
            activity,
        }),
    ))
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Filter by category; "all" or absent means no filter
    category: Option<String>,
    /// Pagination: page number (1-indexed)
    #[serde(default = "default_page")]
    page: u32,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    50
}

const MAX_PER_PAGE: u32 = 100;

fn parse_category_filter(raw: Option<&str>) -> Result<Option<Category>> {
    match raw {
        None | Some("all") => Ok(None),
        Some(name) => serde_json::from_value(serde_json::Value::String(name.to_string()))
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Unknown category '{}'", name))),
    }
}

#[derive(Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<Activity>,
    pub page: u32,
    pub per_page: u32,
    /// Whether another page exists beyond this one
    pub has_more: bool,
}

/// Get the user's activities, newest first.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<ActivitiesResponse>> {
    if params.page < 1 {
        return Err(AppError::BadRequest(
            "Page must be greater than 0".to_string(),
        ));
    }

    let category = parse_category_filter(params.category.as_deref())?;
    let limit = params.per_page.min(MAX_PER_PAGE);
    let offset = (params.page - 1)
        .checked_mul(limit)
        .ok_or_else(|| AppError::BadRequest("Page number causes overflow".to_string()))?;

    tracing::debug!(
        user_id = %user.user_id,
        category = ?category,
        page = params.page,
        "Fetching activities"
    );

    // Fetch one extra item to determine if another page is available.
    let mut activities = state
        .db
        .get_activities_page(&user.user_id, category, limit.saturating_add(1), offset)
        .await?;

    let has_more = activities.len() > limit as usize;
    if has_more {
        activities.truncate(limit as usize);
    }

    Ok(Json(ActivitiesResponse {
        activities,
        page: params.page,
        per_page: limit,
        has_more,
    }))
}

// ─── Deletion ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DeleteActivityResponse {
    pub message: String,
}

/// Delete one of the user's own activities.
async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(activity_id): Path<String>,
) -> Result<Json<DeleteActivityResponse>> {
    // Ownership check before deletion; a foreign ID reads as not found.
    let owned = state
        .db
        .get_activity(&activity_id)
        .await?
        .is_some_and(|activity| activity.user_id == user.user_id);

    if !owned {
        return Err(AppError::NotFound(format!(
            "Activity {} not found",
            activity_id
        )));
    }

    state.db.delete_activity(&activity_id).await?;
    tracing::info!(user_id = %user.user_id, activity_id = %activity_id, "Activity deleted");

    Ok(Json(DeleteActivityResponse {
        message: "Activity deleted successfully".to_string(),
    }))
}

// ─── Catalog ─────────────────────────────────────────────────

/// Get the available categories and their emission factors.
async fn get_categories(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    // Shape: { "transport": { "<key>": { "text": ..., "co2": ... } } }
    Json(serde_json::json!(state.catalog.table()))
}
