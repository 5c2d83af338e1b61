//! Repository for the `users` table.

use sqlx::PgPool;
use storyhub_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, password_hash, email, name, bio, profile_picture, \
                        created_at, updated_at";

/// Unique constraint on `users.username`.
pub const UQ_USERNAME: &str = "uq_users_username";
/// Unique constraint on `users.email`.
pub const UQ_EMAIL: &str = "uq_users_email";
/// Unique constraint on `users.profile_picture`.
pub const UQ_PROFILE_PICTURE: &str = "uq_users_profile_picture";

/// Lookup and insert operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user in its own transaction, returning the created row.
    ///
    /// Uniqueness of username, email and profile picture is enforced by the
    /// table constraints, so a concurrent duplicate fails here with a
    /// unique-violation error naming one of the `UQ_*` constraints.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (username, password_hash, email, name, bio, profile_picture)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.bio)
            .bind(&input.profile_picture)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
