// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard, streak and leaderboard routes.

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Activity, Category};
use crate::services::leaderboard::{self, LeaderboardEntry, Period};
use crate::services::{stats, streak};
use crate::AppState;

/// Number of recent activities embedded in the dashboard response.
const RECENT_ACTIVITIES: usize = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/dashboard/streak", get(get_streak))
        .route("/api/dashboard/leaderboard", get(get_leaderboard))
}

// ─── Dashboard ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct DashboardResponse {
    pub total_emissions: f64,
    pub emissions_by_category: HashMap<Category, f64>,
    pub weekly_emissions: f64,
    pub recent_activities: Vec<Activity>,
    pub community_average: f64,
    /// 1-based ascending rank; 0 means unranked (no activities yet)
    pub user_rank: u32,
    pub total_users: u32,
}

/// Get the user's dashboard statistics.
///
/// Community figures recompute from every record in the system on each
/// request.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let activities = state.db.get_user_activities(&user.user_id).await?;
    let summary = stats::summarize(&activities, chrono::Utc::now());

    let mut recent_activities = activities;
    recent_activities.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    recent_activities.truncate(RECENT_ACTIVITIES);

    let all_activities = state.db.get_all_activities().await?;
    let community = stats::community_stats(&all_activities, &user.user_id);

    Ok(Json(DashboardResponse {
        total_emissions: summary.total,
        emissions_by_category: summary.by_category,
        weekly_emissions: summary.weekly_total,
        recent_activities,
        community_average: community.average,
        user_rank: community.rank,
        total_users: community.total_users,
    }))
}

// ─── Streak ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StreakResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub threshold: f64,
}

/// Get the user's low-emission week streak for the current year.
async fn get_streak(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StreakResponse>> {
    let (_, year) = crate::time_utils::current_week();
    let activities = state.db.get_user_year_activities(&user.user_id, year).await?;

    let mut weekly_totals: HashMap<u32, f64> = HashMap::new();
    for activity in &activities {
        *weekly_totals.entry(activity.week).or_insert(0.0) += activity.co2_kg;
    }

    let threshold = state.config.streak_threshold_kg;
    let result = streak::streak(&weekly_totals, threshold);

    Ok(Json(StreakResponse {
        current_streak: result.current,
        longest_streak: result.longest,
        threshold,
    }))
}

// ─── Leaderboard ─────────────────────────────────────────────

#[derive(Deserialize)]
struct LeaderboardQuery {
    #[serde(default)]
    period: Period,
    limit: Option<u32>,
}

/// Get the community leaderboard (lowest emitters first).
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
    let limit = params.limit.unwrap_or(leaderboard::DEFAULT_LIMIT);
    let entries = leaderboard::leaderboard(&state.db, params.period, limit).await?;
    Ok(Json(entries))
}
