// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and session routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser, SESSION_COOKIE};
use crate::models::User;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

const PBKDF2_ITERATIONS: NonZeroU32 = NonZeroU32::new(100_000).unwrap();
const SALT_LEN: usize = 16;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

/// Routes mounted behind the auth middleware (see routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/me", get(get_me))
}

// ─── Password Hashing ────────────────────────────────────────

fn hash_password(password: &str, salt: &[u8]) -> String {
    let mut derived = [0u8; digest::SHA256_OUTPUT_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        PBKDF2_ITERATIONS,
        salt,
        password.as_bytes(),
        &mut derived,
    );
    STANDARD.encode(derived)
}

fn verify_password(password: &str, salt_b64: &str, hash_b64: &str) -> bool {
    let (Ok(salt), Ok(hash)) = (STANDARD.decode(salt_b64), STANDARD.decode(hash_b64)) else {
        return false;
    };
    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        PBKDF2_ITERATIONS,
        &salt,
        password.as_bytes(),
        &hash,
    )
    .is_ok()
}

// ─── Registration & Login ────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user profile.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
}

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Register a new account and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Username doubles as the document ID, so both checks are cheap.
    if state.db.get_user(&payload.username).await?.is_some()
        || state.db.find_user_by_email(&payload.email).await?.is_some()
    {
        return Err(AppError::BadRequest(
            "Username or email already registered".to_string(),
        ));
    }

    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| anyhow::anyhow!("Failed to generate password salt"))?;

    let user = User {
        id: payload.username.clone(),
        username: payload.username,
        email: payload.email,
        password_hash: hash_password(&payload.password, &salt),
        password_salt: STANDARD.encode(salt),
        created_at: format_utc_rfc3339(chrono::Utc::now()),
    };

    state.db.create_user(&user).await?;
    tracing::info!(user_id = %user.id, "User registered");

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;
    let response = SessionResponse {
        token: token.clone(),
        user: UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    };

    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(&token)),
        Json(response),
    ))
}

/// Log in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    // A missing user and a wrong password produce the same answer.
    let user = state.db.find_user_by_email(&payload.email).await?;
    let valid = user.as_ref().is_some_and(|u| {
        verify_password(&payload.password, &u.password_salt, &u.password_hash)
    });
    let Some(user) = user.filter(|_| valid) else {
        return Err(AppError::BadRequest("Invalid credentials".to_string()));
    };

    tracing::debug!(user_id = %user.id, "User logged in");

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;
    let response = SessionResponse {
        token: token.clone(),
        user: UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    };

    Ok((jar.add(session_cookie(&token)), Json(response)))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// End the session; API clients also just discard their token.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    // The removal cookie must carry the same path as the session cookie.
    let removal = Cookie::build(SESSION_COOKIE).path("/").build();
    (
        jar.remove(removal),
        Json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(UserResponse {
        id: profile.id,
        username: profile.username,
        email: profile.email,
    }))
}
