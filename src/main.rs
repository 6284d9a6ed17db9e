// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint-Logger API Server
//!
//! Tracks everyday CO2 emissions from logged activities and derives
//! weekly reduction goals, streaks and community statistics.

use footprint_logger::{
    config::Config,
    db::FirestoreDb,
    services::{CatalogService, InsightService, RealtimeHub},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Footprint-Logger API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Static emission catalog
    let catalog = CatalogService::new();
    tracing::info!(
        categories = catalog.table().len(),
        "Emission catalog loaded"
    );

    // Realtime hub, shared between the SSE route and the insight engine
    let realtime = RealtimeHub::new();

    // Insight & goal engine
    let insights = InsightService::new(db.clone(), realtime.clone(), config.goal_refresh_policy);
    tracing::info!(policy = ?config.goal_refresh_policy, "Insight engine initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        catalog,
        realtime,
        insights,
    });

    // Build router
    let app = footprint_logger::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("footprint_logger=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
