//! Route definitions for the `/stories` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::stories;
use crate::state::AppState;

/// Routes mounted at `/stories`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(stories::get_story))
        .route("/{id}/reviews", get(stories::list_reviews))
}
