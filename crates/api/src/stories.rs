//! Story service: publishing, rating, and reviewing stories.

use storyhub_core::error::CoreError;
use storyhub_core::story::{validate_review, validate_score, validate_story_fields};
use storyhub_core::types::DbId;
use storyhub_db::models::rating::{CreateRating, Rating};
use storyhub_db::models::review::{CreateReview, Review};
use storyhub_db::models::story::{CreateStory, Story};
use storyhub_db::repositories::{RatingRepo, ReviewRepo, StoryRepo};
use storyhub_db::DbPool;

use crate::db_errors::{foreign_key_violation, storage};

#[derive(Clone)]
pub struct StoryService {
    pool: DbPool,
}

impl StoryService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Publish a new story for an existing author.
    pub async fn publish(&self, input: CreateStory) -> Result<Story, CoreError> {
        validate_story_fields(&input.title, &input.content)?;

        let story = StoryRepo::create(&self.pool, &input)
            .await
            .map_err(missing_parent)?;

        tracing::info!(story_id = story.id, author_id = story.author_id, "Story published");
        Ok(story)
    }

    pub async fn story(&self, id: DbId) -> Result<Story, CoreError> {
        StoryRepo::find_by_id(&self.pool, id)
            .await
            .map_err(storage)?
            .ok_or(CoreError::NotFound { entity: "Story" })
    }

    /// Record a rating. A user rating the same story again replaces the
    /// earlier score; the story aggregate is refreshed either way.
    pub async fn rate(&self, input: CreateRating) -> Result<Rating, CoreError> {
        validate_score(input.rating)?;

        let rating = RatingRepo::rate(&self.pool, &input)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => CoreError::NotFound { entity: "Story" },
                other => missing_parent(other),
            })?;

        tracing::info!(
            story_id = rating.story_id,
            user_id = rating.user_id,
            rating = rating.rating,
            "Story rated"
        );
        Ok(rating)
    }

    pub async fn review(&self, input: CreateReview) -> Result<Review, CoreError> {
        validate_review(input.rating, &input.review_text)?;

        let review = ReviewRepo::create(&self.pool, &input)
            .await
            .map_err(missing_parent)?;

        tracing::info!(review_id = review.id, story_id = review.story_id, "Review added");
        Ok(review)
    }

    /// Reviews of a story, oldest first.
    pub async fn reviews(&self, story_id: DbId) -> Result<Vec<Review>, CoreError> {
        self.story(story_id).await?;
        ReviewRepo::list_for_story(&self.pool, story_id)
            .await
            .map_err(storage)
    }
}

/// Turn a foreign key violation into `NotFound` for the referenced entity.
fn missing_parent(err: sqlx::Error) -> CoreError {
    let entity = match foreign_key_violation(&err) {
        Some(constraint) if constraint.contains("story_id") => Some("Story"),
        Some(_) => Some("User"),
        None => None,
    };
    match entity {
        Some(entity) => CoreError::NotFound { entity },
        None => storage(err),
    }
}
