//! Story entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyhub_core::types::{DbId, Timestamp};

/// A row from the `stories` table.
///
/// `rating` and `num_ratings` are the aggregate over the story's `ratings`
/// rows; `rating` is `None` until the first rating arrives.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Story {
    pub id: DbId,
    pub title: String,
    pub cover_url: Option<String>,
    pub author_id: DbId,
    pub genre: Option<String>,
    pub summary: Option<String>,
    pub content: String,
    pub rating: Option<f64>,
    pub num_ratings: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new story.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStory {
    pub title: String,
    pub cover_url: Option<String>,
    pub author_id: DbId,
    pub genre: Option<String>,
    pub summary: Option<String>,
    pub content: String,
}
