// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Logged activity model for storage and API.

use serde::{Deserialize, Serialize};

/// Coarse classification of loggable activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Transport,
    Food,
    Energy,
}

impl Category {
    /// Lowercase wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Transport => "transport",
            Category::Food => "food",
            Category::Energy => "energy",
        }
    }

    /// All categories, in their canonical (lexical) order.
    pub const ALL: [Category; 3] = [Category::Energy, Category::Food, Category::Transport];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored activity record in Firestore.
///
/// Immutable once created; removed only when the owner deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Document ID
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    /// Activity category
    pub category: Category,
    /// Key into the emission catalog
    pub activity_key: String,
    /// Display label, copied from the catalog at creation time
    pub activity_label: String,
    /// Estimated CO2 mass (kg), fixed at creation from the catalog
    pub co2_kg: f64,
    /// When the activity occurred (RFC3339, UTC)
    pub occurred_at: String,
    /// Week number derived from `occurred_at` at creation time
    pub week: u32,
    /// Year derived from `occurred_at` at creation time
    pub year: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Transport).unwrap(),
            "\"transport\""
        );
        let parsed: Category = serde_json::from_str("\"food\"").unwrap();
        assert_eq!(parsed, Category::Food);
    }

    #[test]
    fn test_category_all_is_lexically_ordered() {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
