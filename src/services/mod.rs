// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod insights;
pub mod leaderboard;
pub mod realtime;
pub mod stats;
pub mod streak;

pub use catalog::{CatalogService, EmissionFactor};
pub use insights::{InsightService, Insights};
pub use realtime::RealtimeHub;
