// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Insight and goal engine.
//!
//! Handles the weekly goal workflow:
//! 1. Select the user's records for the current week (or fall back to the
//!    trailing 28 days)
//! 2. Pick the highest-emitting category
//! 3. Derive a reduction target (10% of that category's total)
//! 4. Select a tip for the category
//! 5. Upsert the (user, week, year) goal
//! 6. Score progress against a trailing 4-week baseline
//! 7. Persist and push a best-effort realtime notification
//!
//! Goal writes are read-modify-write sequences, so every mutation of a
//! (user, week, year) key holds that key's lock for the duration. The
//! locks are per-instance; with multiple instances the last writer still
//! wins on the shared store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use dashmap::DashMap;
use serde_json::json;
use tokio::sync::Mutex;

use crate::config::RefreshPolicy;
use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Category, Goal};
use crate::services::{stats, RealtimeHub};
use crate::time_utils::{current_week, format_utc_rfc3339, start_of_week};

/// Fraction of the highest category's weekly total set as the target.
const TARGET_FRACTION: f64 = 0.10;
/// Fallback selection window when the current week has no records.
const FALLBACK_WINDOW_DAYS: i64 = 28;
/// The baseline averages over this many whole weeks before the current one.
const BASELINE_WEEKS: u32 = 4;

/// Tip returned when the user has nothing logged at all.
const NO_DATA_TIP: &str =
    "Log an activity to get personalised insights and a weekly reduction goal.";

/// Shared per-goal-key locks. One mutex per (user, week, year).
type GoalLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Result of an insight run.
#[derive(Debug, Clone)]
pub struct Insights {
    pub tip: String,
    pub goal: Option<Goal>,
    pub by_category: HashMap<Category, f64>,
}

/// Derives weekly goals and tracks progress against them.
#[derive(Clone)]
pub struct InsightService {
    db: FirestoreDb,
    realtime: RealtimeHub,
    policy: RefreshPolicy,
    goal_locks: GoalLocks,
}

impl InsightService {
    pub fn new(db: FirestoreDb, realtime: RealtimeHub, policy: RefreshPolicy) -> Self {
        Self {
            db,
            realtime,
            policy,
            goal_locks: Arc::new(DashMap::new()),
        }
    }

    /// Run the insight workflow for a user.
    ///
    /// Returns a terminal "log an activity" response when the user has no
    /// records in the current week or the trailing window; this is not an
    /// error.
    pub async fn generate(&self, user_id: &str) -> Result<Insights> {
        let (week, year) = current_week();

        let lock = self.lock_for(user_id, week, year);
        let _guard = lock.lock().await;

        // Step 1: current week, else trailing window.
        let week_records = self.db.get_user_week_activities(user_id, week, year).await?;
        let selected = if week_records.is_empty() {
            let since = format_utc_rfc3339(Utc::now() - Duration::days(FALLBACK_WINDOW_DAYS));
            self.db.get_user_activities_since(user_id, &since).await?
        } else {
            week_records.clone()
        };

        let by_category = stats::sum_by_category(&selected);
        let Some((top_category, top_total)) = highest_category(&by_category) else {
            tracing::debug!(user_id, week, year, "No activity data, generic tip");
            return Ok(Insights {
                tip: NO_DATA_TIP.to_string(),
                goal: None,
                by_category,
            });
        };

        // Steps 2-5: derive the goal, honoring the refresh policy for an
        // existing one.
        let existing = self.db.get_goal(user_id, week, year).await?;
        let now = format_utc_rfc3339(Utc::now());

        let (category, target, tip, created_at) = match (&existing, self.policy) {
            (Some(goal), RefreshPolicy::LockOnFirstCreate) => (
                goal.category,
                goal.target_reduction_kg,
                goal.tip.clone(),
                goal.created_at.clone(),
            ),
            _ => {
                let target = round2(top_total * TARGET_FRACTION);
                let created_at = existing
                    .as_ref()
                    .map(|goal| goal.created_at.clone())
                    .unwrap_or_else(|| now.clone());
                (top_category, target, tip_for(top_category, target), created_at)
            }
        };

        // Step 6: progress against the trailing baseline.
        let baseline = self.category_baseline(user_id, category, week, year).await?;
        let current_total: f64 = week_records
            .iter()
            .filter(|activity| activity.category == category)
            .map(|activity| activity.co2_kg)
            .sum();
        let progress = progress_against_baseline(baseline, current_total, target);

        let goal = Goal {
            user_id: user_id.to_string(),
            week,
            year,
            category,
            target_reduction_kg: target,
            current_progress_kg: progress,
            tip,
            created_at,
            updated_at: now,
        };

        // Step 7: persist, then best-effort notify.
        self.db.set_goal(&goal).await?;
        tracing::info!(
            user_id,
            week,
            year,
            category = %goal.category,
            target = goal.target_reduction_kg,
            progress = goal.current_progress_kg,
            "Goal refreshed"
        );
        self.realtime.notify(
            user_id,
            "goal_update",
            json!({ "tip": goal.tip, "goal": goal }),
        );

        Ok(Insights {
            tip: goal.tip.clone(),
            goal: Some(goal),
            by_category,
        })
    }

    /// Apply a user-reported reduction to the current week's goal.
    pub async fn report_progress(&self, user_id: &str, amount_kg: f64) -> Result<Goal> {
        if !amount_kg.is_finite() || amount_kg <= 0.0 {
            return Err(AppError::BadRequest(
                "Progress amount must be a positive number".to_string(),
            ));
        }

        let (week, year) = current_week();

        let lock = self.lock_for(user_id, week, year);
        let _guard = lock.lock().await;

        let mut goal = self
            .db
            .get_goal(user_id, week, year)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No goal exists for week {} of {}", week, year))
            })?;

        goal.current_progress_kg = round2(
            (goal.current_progress_kg + amount_kg).clamp(0.0, goal.target_reduction_kg),
        );
        goal.updated_at = format_utc_rfc3339(Utc::now());

        self.db.set_goal(&goal).await?;
        tracing::info!(
            user_id,
            week,
            year,
            progress = goal.current_progress_kg,
            target = goal.target_reduction_kg,
            "Goal progress reported"
        );
        self.realtime
            .notify(user_id, "goal_progress", json!({ "goal": goal }));

        Ok(goal)
    }

    /// Average weekly emissions in a category over the four whole weeks
    /// preceding the current one.
    ///
    /// Missing weeks contribute zero to the sum but still divide: this is
    /// a true 4-week average, not an average over weeks with data.
    async fn category_baseline(
        &self,
        user_id: &str,
        category: Category,
        week: u32,
        year: i32,
    ) -> Result<f64> {
        let window_end = start_of_week(week, year)
            .ok_or_else(|| anyhow::anyhow!("Week {} of {} out of range", week, year))?;
        let window_start = window_end - Duration::days(7 * BASELINE_WEEKS as i64);

        let records = self
            .db
            .get_user_category_activities_in_range(
                user_id,
                category,
                &format_utc_rfc3339(window_start),
                &format_utc_rfc3339(window_end),
            )
            .await?;

        let total: f64 = records.iter().map(|activity| activity.co2_kg).sum();
        Ok(total / BASELINE_WEEKS as f64)
    }

    fn lock_for(&self, user_id: &str, week: u32, year: i32) -> Arc<Mutex<()>> {
        self.goal_locks
            .entry(Goal::doc_id(user_id, week, year))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Round to two decimals (kg CO2 are reported at 10 g resolution).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The category with the strictly highest total.
///
/// Exact ties resolve to the lexically first category name, so repeated
/// runs over the same data always pick the same goal.
fn highest_category(by_category: &HashMap<Category, f64>) -> Option<(Category, f64)> {
    let mut best: Option<(Category, f64)> = None;
    for category in Category::ALL {
        if let Some(&total) = by_category.get(&category) {
            match best {
                Some((_, best_total)) if total <= best_total => {}
                _ => best = Some((category, total)),
            }
        }
    }
    best
}

/// Category-specific tip embedding the week's target.
fn tip_for(category: Category, target_kg: f64) -> String {
    match category {
        Category::Transport => format!(
            "Transport is your biggest source this week. Try walking, cycling or \
             public transport for short trips to cut about {:.2} kg CO2.",
            target_kg
        ),
        Category::Food => format!(
            "Food is your biggest source this week. Swapping a couple of red-meat \
             meals for plant-based ones could save about {:.2} kg CO2.",
            target_kg
        ),
        Category::Energy => format!(
            "Energy use is your biggest source this week. Turning down heating and \
             switching devices off standby could save about {:.2} kg CO2.",
            target_kg
        ),
    }
}

/// Progress credited from the baseline comparison, clamped to the target.
///
/// No history means no claimable reduction: a zero baseline forces zero
/// progress no matter what the current week looks like.
fn progress_against_baseline(baseline: f64, current_total: f64, target_kg: f64) -> f64 {
    if baseline <= 0.0 {
        return 0.0;
    }
    let avoided = (baseline - current_total).max(0.0);
    round2(avoided.min(target_kg))
}
