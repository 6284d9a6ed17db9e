// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod goal;
pub mod user;

pub use activity::{Activity, Category};
pub use goal::Goal;
pub use user::User;
