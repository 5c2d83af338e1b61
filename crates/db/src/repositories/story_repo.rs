//! Repository for the `stories` table.

use sqlx::PgPool;
use storyhub_core::types::DbId;

use crate::models::story::{CreateStory, Story};

const COLUMNS: &str = "id, title, cover_url, author_id, genre, summary, content, \
                        rating, num_ratings, created_at, updated_at";

pub struct StoryRepo;

impl StoryRepo {
    /// Insert a new story. Fails with a foreign-key violation when the
    /// author does not exist.
    pub async fn create(pool: &PgPool, input: &CreateStory) -> Result<Story, sqlx::Error> {
        let query = format!(
            "INSERT INTO stories (title, cover_url, author_id, genre, summary, content)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(&input.title)
            .bind(&input.cover_url)
            .bind(input.author_id)
            .bind(&input.genre)
            .bind(&input.summary)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE id = $1");
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an author's stories, newest first.
    pub async fn list_by_author(pool: &PgPool, author_id: DbId) -> Result<Vec<Story>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stories WHERE author_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }
}
