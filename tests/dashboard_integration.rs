// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard, streak and leaderboard integration tests (requires
//! Firestore emulator).

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use footprint_logger::models::{Category, User};
use serde_json::Value;
use tower::ServiceExt;

mod common;
use common::{create_emulator_app, make_activity, unique_user_id};

async fn seed_user(db: &footprint_logger::db::FirestoreDb, user_id: &str) {
    db.create_user(&User {
        id: user_id.to_string(),
        username: user_id.to_string(),
        email: format!("{}@example.com", user_id),
        password_hash: "hash".to_string(),
        password_salt: "salt".to_string(),
        created_at: footprint_logger::time_utils::format_utc_rfc3339(Utc::now()),
    })
    .await
    .unwrap();
}

async fn get_json(app: axum::Router, uri: &str, token: &str) -> Value {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_dashboard_totals_and_recent_activities() {
    require_emulator!();
    let (app, state) = create_emulator_app().await;
    let user = unique_user_id("dash");
    seed_user(&state.db, &user).await;

    // Two entries this week, one from three weeks back.
    state
        .db
        .set_activity(&make_activity(&user, Category::Food, 27.0, Utc::now(), 0))
        .await
        .unwrap();
    state
        .db
        .set_activity(&make_activity(
            &user,
            Category::Transport,
            0.15,
            Utc::now() - Duration::seconds(30),
            1,
        ))
        .await
        .unwrap();
    state
        .db
        .set_activity(&make_activity(
            &user,
            Category::Energy,
            8.0,
            Utc::now() - Duration::days(21),
            2,
        ))
        .await
        .unwrap();

    let token = common::create_test_jwt(&user, &state.config.jwt_signing_key);
    let body = get_json(app, "/api/dashboard", &token).await;

    assert!((body["total_emissions"].as_f64().unwrap() - 35.15).abs() < 1e-9);
    assert!((body["weekly_emissions"].as_f64().unwrap() - 27.15).abs() < 1e-9);
    assert_eq!(
        body["emissions_by_category"]["food"].as_f64().unwrap(),
        27.0
    );
    assert_eq!(
        body["emissions_by_category"]["energy"].as_f64().unwrap(),
        8.0
    );

    // Newest first.
    let recent = body["recent_activities"].as_array().unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0]["category"], "food");
    assert_eq!(recent[2]["category"], "energy");

    // This user exists in the community, so it must hold a real rank.
    assert!(body["user_rank"].as_u64().unwrap() >= 1);
    assert!(body["total_users"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_streak_reflects_current_week() {
    require_emulator!();
    let (app, state) = create_emulator_app().await;
    let user = unique_user_id("streak");
    seed_user(&state.db, &user).await;

    // 27 kg this week: under the 100 kg threshold.
    state
        .db
        .set_activity(&make_activity(&user, Category::Food, 27.0, Utc::now(), 0))
        .await
        .unwrap();

    let token = common::create_test_jwt(&user, &state.config.jwt_signing_key);
    let body = get_json(app, "/api/dashboard/streak", &token).await;

    assert_eq!(body["current_streak"], 1);
    assert_eq!(body["longest_streak"], 1);
    assert_eq!(body["threshold"], 100.0);
}

#[tokio::test]
async fn test_streak_broken_by_heavy_week() {
    require_emulator!();
    let (app, state) = create_emulator_app().await;
    let user = unique_user_id("heavy");
    seed_user(&state.db, &user).await;

    state
        .db
        .set_activity(&make_activity(&user, Category::Energy, 150.0, Utc::now(), 0))
        .await
        .unwrap();

    let token = common::create_test_jwt(&user, &state.config.jwt_signing_key);
    let body = get_json(app, "/api/dashboard/streak", &token).await;

    assert_eq!(body["current_streak"], 0);
    assert_eq!(body["longest_streak"], 0);
}

#[tokio::test]
async fn test_leaderboard_ranks_low_emitters_first() {
    require_emulator!();
    let (app, state) = create_emulator_app().await;

    let low = unique_user_id("low");
    let high = unique_user_id("high");
    seed_user(&state.db, &low).await;
    seed_user(&state.db, &high).await;

    state
        .db
        .set_activity(&make_activity(&low, Category::Transport, 0.07, Utc::now(), 0))
        .await
        .unwrap();
    state
        .db
        .set_activity(&make_activity(&high, Category::Food, 270.0, Utc::now(), 0))
        .await
        .unwrap();

    let token = common::create_test_jwt(&low, &state.config.jwt_signing_key);
    let body = get_json(
        app,
        "/api/dashboard/leaderboard?period=week&limit=50",
        &token,
    )
    .await;

    let entries = body.as_array().unwrap();
    assert!(entries.len() <= 50);

    // Ascending by emissions throughout.
    let totals: Vec<f64> = entries
        .iter()
        .map(|e| e["total_emissions"].as_f64().unwrap())
        .collect();
    assert!(totals.windows(2).all(|w| w[0] <= w[1]));

    // Our low emitter ranks above our high emitter.
    let position = |name: &str| {
        entries
            .iter()
            .position(|e| e["username"] == name)
            .unwrap_or(usize::MAX)
    };
    assert!(position(&low) < position(&high));
}
