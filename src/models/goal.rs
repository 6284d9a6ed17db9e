// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Weekly reduction goal model.

use serde::{Deserialize, Serialize};

use crate::models::Category;

/// Per-user, per-week reduction goal.
///
/// Stored in the `goals` collection under a composite document ID, so at
/// most one goal can exist per (user, week, year). Goals are never
/// deleted; a new week simply gets a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Owning user ID
    pub user_id: String,
    /// Week number this goal applies to
    pub week: u32,
    /// Year this goal applies to
    pub year: i32,
    /// Category targeted this week
    pub category: Category,
    /// How many kg CO2 to cut this week
    pub target_reduction_kg: f64,
    /// How many kg the user has already avoided, clamped to
    /// [0, target_reduction_kg]
    pub current_progress_kg: f64,
    /// Human-readable suggestion for hitting the target
    pub tip: String,
    /// When the goal was first created (RFC3339)
    pub created_at: String,
    /// When the goal was last refreshed (RFC3339)
    pub updated_at: String,
}

impl Goal {
    /// Composite document ID for the (user, week, year) key.
    pub fn doc_id(user_id: &str, week: u32, year: i32) -> String {
        format!("{}_{}_{}", urlencoding::encode(user_id), year, week)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_is_stable_and_escaped() {
        assert_eq!(Goal::doc_id("ada", 14, 2025), "ada_2025_14");
        // User IDs are escaped so the composite key cannot collide.
        assert_eq!(Goal::doc_id("a_b", 1, 2025), "a_b_2025_1");
        assert_eq!(Goal::doc_id("a/b", 1, 2025), "a%2Fb_2025_1");
    }
}
