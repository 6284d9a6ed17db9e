//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Document ID (equal to the username at registration time)
    pub id: String,
    /// Display name, unique
    pub username: String,
    /// Email address, unique
    pub email: String,
    /// PBKDF2-HMAC-SHA256 password hash (base64)
    pub password_hash: String,
    /// Per-user random salt (base64)
    pub password_salt: String,
    /// When the user registered (RFC3339)
    pub created_at: String,
}
