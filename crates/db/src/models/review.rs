//! Review entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyhub_core::types::{DbId, Timestamp};

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub story_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub review_text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new review.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub story_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub review_text: String,
}
