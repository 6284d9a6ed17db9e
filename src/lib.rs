// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Footprint-Logger: Track everyday CO2 emissions and reduce them week by week.
//!
//! This crate provides the backend API for logging activities (transport,
//! food, energy use), aggregating them into personal and community
//! statistics, and deriving a per-week reduction goal with a tip.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{CatalogService, InsightService, RealtimeHub};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub catalog: CatalogService,
    pub realtime: RealtimeHub,
    pub insights: InsightService,
}
