//! Field rules for stories, ratings, and reviews.

use crate::error::CoreError;

/// Lowest score a rating or review may carry.
pub const MIN_SCORE: i32 = 1;

/// Highest score a rating or review may carry.
pub const MAX_SCORE: i32 = 5;

/// Check that a rating or review score is within [`MIN_SCORE`]..=[`MAX_SCORE`].
pub fn validate_score(score: i32) -> Result<(), CoreError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )));
    }
    Ok(())
}

/// Check the required text fields of a new story.
pub fn validate_story_fields(title: &str, content: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Story title must not be empty".into()));
    }
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Story content must not be empty".into(),
        ));
    }
    Ok(())
}

/// Check the fields of a new review.
pub fn validate_review(score: i32, review_text: &str) -> Result<(), CoreError> {
    validate_score(score)?;
    if review_text.trim().is_empty() {
        return Err(CoreError::Validation("Review text must not be empty".into()));
    }
    Ok(())
}
