//! Read-only handlers for the `/stories` resource.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use storyhub_core::types::DbId;
use storyhub_db::models::review::Review;
use storyhub_db::models::story::Story;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/stories/{id}
pub async fn get_story(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<DataResponse<Story>>> {
    let Path(id) = id?;
    let story = state.stories.story(id).await?;
    Ok(Json(DataResponse { data: story }))
}

/// GET /api/v1/stories/{id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let Path(id) = id?;
    let reviews = state.stories.reviews(id).await?;
    Ok(Json(DataResponse { data: reviews }))
}
