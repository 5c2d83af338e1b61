//! Rating entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyhub_core::types::{DbId, Timestamp};

/// A row from the `ratings` table. At most one per (story, user).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub story_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for rating a story.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRating {
    pub story_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
}
