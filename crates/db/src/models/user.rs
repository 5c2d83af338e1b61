//! User entity model and DTOs.

use serde::Deserialize;
use sqlx::FromRow;
use storyhub_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash; intentionally not `Serialize`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user. The email must already be canonical and
/// the password already hashed.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}
