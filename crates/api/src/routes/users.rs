//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST     /create   -> create_user
/// GET,POST /login    -> login
/// POST     /logout   -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(users::create_user))
        .route("/login", get(users::login).post(users::login))
        .route("/logout", post(users::logout))
}
