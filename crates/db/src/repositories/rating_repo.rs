//! Repository for the `ratings` table and the story rating aggregate.

use sqlx::PgPool;
use storyhub_core::types::DbId;

use crate::models::rating::{CreateRating, Rating};

const COLUMNS: &str = "id, story_id, user_id, rating, created_at, updated_at";

/// Unique constraint allowing one rating per user per story.
pub const UQ_STORY_USER: &str = "uq_ratings_story_user";

pub struct RatingRepo;

impl RatingRepo {
    /// Record a user's rating of a story, replacing any earlier rating by
    /// the same user, and refresh `stories.rating` / `stories.num_ratings`.
    ///
    /// Runs in one transaction holding a row lock on the story, so
    /// concurrent ratings of the same story never leave a stale aggregate.
    /// Returns `RowNotFound` when the story does not exist.
    pub async fn rate(pool: &PgPool, input: &CreateRating) -> Result<Rating, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM stories WHERE id = $1 FOR UPDATE")
            .bind(input.story_id)
            .fetch_one(&mut *tx)
            .await?;

        let upsert = format!(
            "INSERT INTO ratings (story_id, user_id, rating)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT {UQ_STORY_USER}
             DO UPDATE SET rating = EXCLUDED.rating
             RETURNING {COLUMNS}"
        );
        let rating = sqlx::query_as::<_, Rating>(&upsert)
            .bind(input.story_id)
            .bind(input.user_id)
            .bind(input.rating)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE stories SET
                rating = agg.avg_rating,
                num_ratings = agg.total
             FROM (
                SELECT AVG(rating)::DOUBLE PRECISION AS avg_rating,
                       COUNT(*)::INTEGER AS total
                FROM ratings
                WHERE story_id = $1
             ) AS agg
             WHERE stories.id = $1",
        )
        .bind(input.story_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(rating)
    }

    /// Find the rating a user gave a story, if any.
    pub async fn find_for_user(
        pool: &PgPool,
        story_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ratings WHERE story_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Rating>(&query)
            .bind(story_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_story(pool: &PgPool, story_id: DbId) -> Result<Vec<Rating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ratings WHERE story_id = $1 ORDER BY id");
        sqlx::query_as::<_, Rating>(&query)
            .bind(story_id)
            .fetch_all(pool)
            .await
    }
}
