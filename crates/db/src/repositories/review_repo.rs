//! Repository for the `reviews` table.

use sqlx::PgPool;
use storyhub_core::types::DbId;

use crate::models::review::{CreateReview, Review};

const COLUMNS: &str = "id, story_id, user_id, rating, review_text, created_at, updated_at";

pub struct ReviewRepo;

impl ReviewRepo {
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (story_id, user_id, rating, review_text)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.story_id)
            .bind(input.user_id)
            .bind(input.rating)
            .bind(&input.review_text)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a story's reviews, oldest first.
    pub async fn list_for_story(pool: &PgPool, story_id: DbId) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE story_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(story_id)
            .fetch_all(pool)
            .await
    }
}
