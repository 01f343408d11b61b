//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use kbflow_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub full_name: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password is already hashed by the
/// caller; plaintext never reaches this layer.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub is_admin: bool,
}

/// DTO for updating an existing user. Only non-`None` fields are applied.
/// Built by handlers, never deserialized from a request body -- the
/// plaintext-password request types live in the API layer.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
}
