// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static emission catalog.
//!
//! Maps (category, activity key) to an estimated CO2 mass per occurrence.
//! The factors are coarse averages; an activity's `co2_kg` is copied from
//! here exactly once, when it is logged, so later catalog edits never
//! rewrite history.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::Category;

/// One catalog entry: display label and CO2 estimate in kg.
#[derive(Debug, Clone, Serialize)]
pub struct EmissionFactor {
    #[serde(rename = "text")]
    pub label: String,
    #[serde(rename = "co2")]
    pub co2_kg: f64,
}

/// Lookup table from category and activity key to emission factor.
pub struct CatalogService {
    table: HashMap<Category, HashMap<String, EmissionFactor>>,
}

impl CatalogService {
    pub fn new() -> Self {
        let mut table = HashMap::new();

        table.insert(
            Category::Transport,
            entries(&[
                ("Personal car (Petro/diesel)", "Personal car (Petro/diesel)", 0.15),
                ("taxi or uber/Bolt", "Taxi or Uber/Bolt", 0.18),
                ("airplane flight", "Airplane flight", 0.25),
                ("Scooter", "Scooter", 0.07),
                ("Electric cars", "Electric cars", 0.10),
            ]),
        );

        table.insert(
            Category::Food,
            entries(&[
                ("Beef", "Beef", 27.0),
                ("Chicken", "Chicken", 6.0),
                ("cheese", "Cheese", 10.0),
                ("Eggs", "Eggs", 4.5),
                (
                    "Cold drink(coca-cola, sprite etc)",
                    "Cold drink (Coca-Cola, Sprite etc)",
                    0.3,
                ),
            ]),
        );

        table.insert(
            Category::Energy,
            entries(&[
                ("TV/computer", "TV/Computer", 0.05),
                ("washing machine", "Washing machine", 1.8),
                ("house Lights", "House lights", 0.01),
                ("Fridge", "Fridge", 0.5),
                ("heater", "Heater", 8.0),
                ("gas heater", "Gas heater", 1.0),
                ("charging phone", "Charging phone", 0.01),
            ]),
        );

        Self { table }
    }

    /// Look up the emission factor for an activity key within a category.
    pub fn lookup(&self, category: Category, activity_key: &str) -> Option<&EmissionFactor> {
        self.table.get(&category)?.get(activity_key)
    }

    /// The whole catalog, for the categories endpoint.
    pub fn table(&self) -> &HashMap<Category, HashMap<String, EmissionFactor>> {
        &self.table
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}

fn entries(raw: &[(&str, &str, f64)]) -> HashMap<String, EmissionFactor> {
    raw.iter()
        .map(|&(key, label, co2_kg)| {
            (
                key.to_string(),
                EmissionFactor {
                    label: label.to_string(),
                    co2_kg,
                },
            )
        })
        .collect()
}
