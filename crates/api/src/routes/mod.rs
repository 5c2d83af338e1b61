pub mod health;
pub mod stories;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/create                                    create account (POST)
/// /users/login                                     verify credentials (GET, POST)
/// /users/logout                                    no-op (POST)
///
/// /stories/{id}                                    get story
/// /stories/{id}/reviews                            list reviews
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/stories", stories::router())
}
