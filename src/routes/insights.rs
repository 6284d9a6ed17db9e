// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly insight and goal progress routes.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Category, Goal};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/insights", get(get_insights))
        .route("/api/insights/progress", post(report_progress))
}

#[derive(Serialize)]
pub struct InsightsResponse {
    pub tip: String,
    /// Absent when the user has no activity history yet
    pub goal: Option<Goal>,
    pub emissions_by_category: HashMap<Category, f64>,
}

/// Generate (or refresh) this week's goal and tip for the user.
async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<InsightsResponse>> {
    let insights = state.insights.generate(&user.user_id).await?;

    Ok(Json(InsightsResponse {
        tip: insights.tip,
        goal: insights.goal,
        emissions_by_category: insights.by_category,
    }))
}

#[derive(Deserialize)]
pub struct ReportProgressRequest {
    pub amount_kg: f64,
}

#[derive(Serialize)]
pub struct ReportProgressResponse {
    pub goal: Goal,
}

/// Report a manual reduction toward this week's goal.
async fn report_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ReportProgressRequest>,
) -> Result<Json<ReportProgressResponse>> {
    let goal = state
        .insights
        .report_progress(&user.user_id, payload.amount_kg)
        .await?;

    Ok(Json(ReportProgressResponse { goal }))
}
