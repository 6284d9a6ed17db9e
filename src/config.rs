//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup and cached in memory; handlers only
//! ever see the parsed `Config`.

use std::env;

/// How the insight engine treats a goal that already exists for the
/// current week when new activity data arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Re-derive category, target and tip on every insight run.
    Adaptive,
    /// Keep the category, target and tip fixed once the week's goal has
    /// been created; only progress is refreshed.
    LockOnFirstCreate,
}

impl RefreshPolicy {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw {
            "adaptive" => Ok(Self::Adaptive),
            "lock-on-first-create" => Ok(Self::LockOnFirstCreate),
            _ => Err(ConfigError::Invalid("GOAL_REFRESH_POLICY")),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Weekly emission threshold for the low-emission streak (kg CO2)
    pub streak_threshold_kg: f64,
    /// Goal refresh behavior for repeated insight runs within a week
    pub goal_refresh_policy: RefreshPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            streak_threshold_kg: match env::var("STREAK_THRESHOLD_KG") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|_| ConfigError::Invalid("STREAK_THRESHOLD_KG"))?,
                Err(_) => 100.0,
            },
            goal_refresh_policy: match env::var("GOAL_REFRESH_POLICY") {
                Ok(raw) => RefreshPolicy::parse(&raw)?,
                Err(_) => RefreshPolicy::Adaptive,
            },
        })
    }

    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            streak_threshold_kg: 100.0,
            goal_refresh_policy: RefreshPolicy::Adaptive,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
