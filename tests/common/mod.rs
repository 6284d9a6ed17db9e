// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use footprint_logger::config::Config;
use footprint_logger::db::FirestoreDb;
use footprint_logger::models::{Activity, Category};
use footprint_logger::routes::create_router;
use footprint_logger::services::{CatalogService, InsightService, RealtimeHub};
use footprint_logger::time_utils::format_utc_rfc3339;
use footprint_logger::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test JWT for a user, signed with the given key.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    footprint_logger::middleware::auth::create_jwt(user_id, signing_key)
        .expect("Failed to create JWT")
}

fn build_state(db: FirestoreDb) -> Arc<AppState> {
    let config = Config::test_default();
    let realtime = RealtimeHub::new();
    let insights = InsightService::new(db.clone(), realtime.clone(), config.goal_refresh_policy);

    Arc::new(AppState {
        config,
        db,
        catalog: CatalogService::new(),
        realtime,
        insights,
    })
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = build_state(test_db_offline());
    (create_router(state.clone()), state)
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    let state = build_state(test_db().await);
    (create_router(state.clone()), state)
}

/// Build an activity record the way the logging route does, with a
/// unique ID derived from the timestamp and a disambiguating tag.
#[allow(dead_code)]
pub fn make_activity(
    user_id: &str,
    category: Category,
    co2_kg: f64,
    occurred_at: chrono::DateTime<chrono::Utc>,
    tag: u32,
) -> Activity {
    let (week, year) = footprint_logger::time_utils::week_of(occurred_at);
    Activity {
        id: format!("{}-{}-{}", user_id, occurred_at.timestamp_micros(), tag),
        user_id: user_id.to_string(),
        category,
        activity_key: "test".to_string(),
        activity_label: "Test".to_string(),
        co2_kg,
        occurred_at: format_utc_rfc3339(occurred_at),
        week,
        year,
    }
}

/// A user ID that cannot collide across test runs against a shared
/// emulator instance.
#[allow(dead_code)]
pub fn unique_user_id(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_micros())
}
