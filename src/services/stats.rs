//! Aggregation engine.
//!
//! Pure computations over sets of already-fetched activity records:
//! personal totals and breakdowns, plus community average and rank.
//! Nothing here performs I/O or caches anything; every number is
//! recomputed from the records handed in.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{Activity, Category};
use crate::time_utils::week_of;

/// Personal emission summary over a set of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Sum of CO2 over all records (kg)
    pub total: f64,
    /// Sum grouped by category; categories with no activity are absent
    pub by_category: HashMap<Category, f64>,
    /// Sum over records whose stored (week, year) is the week of `as_of`
    pub weekly_total: f64,
}

/// Summarize a user's records as of a given instant.
///
/// The weekly total matches on the records' *stored* week/year keys, the
/// same keys assigned at write time, so write and read paths can never
/// disagree about which week an activity belongs to.
pub fn summarize(records: &[Activity], as_of: DateTime<Utc>) -> Summary {
    let (current_week, current_year) = week_of(as_of);

    let mut total = 0.0;
    let mut weekly_total = 0.0;
    let by_category = records.iter().fold(HashMap::new(), |mut acc, activity| {
        total += activity.co2_kg;
        if activity.week == current_week && activity.year == current_year {
            weekly_total += activity.co2_kg;
        }
        *acc.entry(activity.category).or_insert(0.0) += activity.co2_kg;
        acc
    });

    Summary {
        total,
        by_category,
        weekly_total,
    }
}

/// Sum a record set by category. Categories with no records are absent.
pub fn sum_by_category(records: &[Activity]) -> HashMap<Category, f64> {
    let mut sums = HashMap::new();
    for activity in records {
        *sums.entry(activity.category).or_insert(0.0) += activity.co2_kg;
    }
    sums
}

/// Community-wide figures derived from every user's records.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityStats {
    /// Mean of per-user totals over users with at least one record
    pub average: f64,
    /// 1-based ascending rank of the target user; 0 means unranked
    pub rank: u32,
    /// Number of users with at least one record
    pub total_users: u32,
}

/// Compute community average and the target user's rank.
///
/// Rank 1 is the lowest emitter. Users without any records are not part
/// of the population: they neither pull the average toward zero nor
/// occupy a rank. Exact ties are ordered by user ID so the result is
/// deterministic across runs.
pub fn community_stats(all_records: &[Activity], target_user_id: &str) -> CommunityStats {
    let mut per_user: HashMap<&str, f64> = HashMap::new();
    for activity in all_records {
        *per_user.entry(activity.user_id.as_str()).or_insert(0.0) += activity.co2_kg;
    }

    let total_users = per_user.len() as u32;
    if total_users == 0 {
        return CommunityStats {
            average: 0.0,
            rank: 0,
            total_users: 0,
        };
    }

    let average = per_user.values().sum::<f64>() / total_users as f64;

    let mut ranked: Vec<(&str, f64)> = per_user.into_iter().collect();
    ranked.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    let rank = ranked
        .iter()
        .position(|(user_id, _)| *user_id == target_user_id)
        .map(|index| index as u32 + 1)
        .unwrap_or(0);

    CommunityStats {
        average,
        rank,
        total_users,
    }
}
