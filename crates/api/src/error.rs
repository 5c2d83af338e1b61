use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use storyhub_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`]; extractor rejections convert into
/// [`CoreError::MalformedInput`]. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `storyhub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    /// A body that is not parseable JSON is malformed input.
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::MalformedInput(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Core(CoreError::MalformedInput(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a domain error to its HTTP status, stable code, and caller-safe message.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    let status = match err {
        CoreError::MalformedInput(_)
        | CoreError::MissingField(_)
        | CoreError::InvalidEmail(_)
        | CoreError::InvalidUsername(_)
        | CoreError::WeakPassword(_)
        | CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Conflict(_) => StatusCode::CONFLICT,
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::InvalidCredentials => StatusCode::FORBIDDEN,
        CoreError::Storage | CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match err {
        CoreError::MalformedInput(msg)
        | CoreError::Conflict(msg)
        | CoreError::InvalidEmail(msg)
        | CoreError::InvalidUsername(msg)
        | CoreError::WeakPassword(msg)
        | CoreError::Validation(msg) => msg.clone(),
        CoreError::MissingField(field) => format!("Missing required field: {field}"),
        CoreError::NotFound { entity } => format!("{entity} not found"),
        CoreError::InvalidCredentials => "Invalid credentials".to_string(),
        CoreError::Storage => "The data store is unavailable".to_string(),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            "An internal error occurred".to_string()
        }
    };

    (status, err.code(), message)
}
