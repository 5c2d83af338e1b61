//! Handlers for the `/users` resource (create, login, logout).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use storyhub_core::types::DbId;

use crate::account::{parse_record, CreatedAccount, Credentials, NewAccount};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub verified: bool,
    pub user_id: DbId,
}

/// POST /api/v1/users/create
///
/// Create an account from `{username, password, email, name?, bio?,
/// profile_picture?}`. Returns 201 with the new identity.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedAccount>>)> {
    let Json(body) = payload?;
    let input: NewAccount = parse_record(body)?;

    let created = state.accounts.create_user(input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET|POST /api/v1/users/login
///
/// Verify `{email, password}`.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let Json(body) = payload?;
    let credentials: Credentials = parse_record(body)?;

    let identity = state.accounts.authenticate(credentials).await?;

    Ok(Json(DataResponse {
        data: LoginResponse {
            verified: true,
            user_id: identity.user_id,
        },
    }))
}

/// POST /api/v1/users/logout
///
/// No server-side session exists, so this always returns 204 No Content.
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.accounts.logout().await;
    StatusCode::NO_CONTENT
}
