// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Eco-leaderboard: users ranked ascending by summed emissions.
//!
//! Lower is better. Username resolution is best-effort per entry: a user
//! that no longer exists gets a placeholder, a failed lookup drops that
//! entry only — one bad row never fails the whole board.

use std::collections::HashMap;

use chrono::Utc;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::Activity;
use crate::time_utils::{current_week, format_utc_rfc3339, month_bounds};

const MAX_CONCURRENT_LOOKUPS: usize = 10;

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 50;

/// Placeholder shown when a user's profile is missing.
const UNKNOWN_USER: &str = "Unknown User";

/// Time window selecting which records count toward the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    All,
    /// Records whose stored (week, year) key is the current week
    Week,
    /// Records whose timestamp falls in the current calendar month
    Month,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub total_emissions: f64,
}

/// Build the leaderboard for a period, truncated to `limit` entries.
pub async fn leaderboard(
    db: &FirestoreDb,
    period: Period,
    limit: u32,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    let records = match period {
        Period::All => db.get_all_activities().await?,
        Period::Week => {
            let (week, year) = current_week();
            db.get_week_activities(week, year).await?
        }
        Period::Month => {
            let (start, end) = month_bounds(Utc::now())
                .ok_or_else(|| anyhow::anyhow!("Month bounds out of range"))?;
            db.get_activities_in_range(&format_utc_rfc3339(start), &format_utc_rfc3339(end))
                .await?
        }
    };

    let totals = sum_per_user(&records);

    // Resolve display names with bounded concurrency; a missing profile
    // becomes a placeholder, a lookup error drops that entry only.
    let resolved: Vec<Option<LeaderboardEntry>> = stream::iter(totals)
        .map(|(user_id, total_emissions)| async move {
            match db.get_user(&user_id).await {
                Ok(Some(user)) => Some(LeaderboardEntry {
                    username: user.username,
                    total_emissions,
                }),
                Ok(None) => Some(LeaderboardEntry {
                    username: UNKNOWN_USER.to_string(),
                    total_emissions,
                }),
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "Dropping leaderboard entry");
                    None
                }
            }
        })
        .buffer_unordered(MAX_CONCURRENT_LOOKUPS)
        .collect()
        .await;

    Ok(rank_entries(
        resolved.into_iter().flatten().collect(),
        limit,
    ))
}

/// Sum emissions per user over a record set.
pub fn sum_per_user(records: &[Activity]) -> HashMap<String, f64> {
    let mut totals = HashMap::new();
    for activity in records {
        *totals.entry(activity.user_id.clone()).or_insert(0.0) += activity.co2_kg;
    }
    totals
}

/// Sort entries ascending by emissions (username breaks exact ties) and
/// truncate to at most `min(limit, MAX_LIMIT)` rows.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>, limit: u32) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| {
        a.total_emissions
            .partial_cmp(&b.total_emissions)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.username.cmp(&b.username))
    });
    entries.truncate(limit.min(MAX_LIMIT) as usize);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn act(user_id: &str, co2_kg: f64) -> Activity {
        Activity {
            id: format!("{}-{}", user_id, co2_kg),
            user_id: user_id.to_string(),
            category: Category::Food,
            activity_key: "Beef".to_string(),
            activity_label: "Beef".to_string(),
            co2_kg,
            occurred_at: "2025-01-01T00:00:00Z".to_string(),
            week: 1,
            year: 2025,
        }
    }

    fn entry(username: &str, total_emissions: f64) -> LeaderboardEntry {
        LeaderboardEntry {
            username: username.to_string(),
            total_emissions,
        }
    }

    #[test]
    fn test_sum_per_user() {
        let totals = sum_per_user(&[act("ada", 1.5), act("bob", 2.0), act("ada", 0.5)]);
        assert_eq!(totals["ada"], 2.0);
        assert_eq!(totals["bob"], 2.0);
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn test_rank_ascending_lowest_first() {
        let ranked = rank_entries(
            vec![entry("ada", 30.0), entry("bob", 10.0), entry("cyd", 20.0)],
            10,
        );
        let names: Vec<&str> = ranked.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["bob", "cyd", "ada"]);
    }

    #[test]
    fn test_ties_break_on_username() {
        let ranked = rank_entries(vec![entry("zoe", 5.0), entry("ada", 5.0)], 10);
        let names: Vec<&str> = ranked.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["ada", "zoe"]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let entries = (0..20).map(|i| entry(&format!("u{:02}", i), i as f64)).collect();
        assert_eq!(rank_entries(entries, 3).len(), 3);
    }

    #[test]
    fn test_limit_is_capped() {
        let entries = (0..60).map(|i| entry(&format!("u{:02}", i), i as f64)).collect::<Vec<_>>();
        assert_eq!(rank_entries(entries, 1000).len(), MAX_LIMIT as usize);
    }

    #[test]
    fn test_period_deserializes_lowercase() {
        let period: Period = serde_json::from_str("\"month\"").unwrap();
        assert_eq!(period, Period::Month);
    }
}
