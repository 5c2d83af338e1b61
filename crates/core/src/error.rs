/// Domain error taxonomy shared by the service layer and the HTTP layer.
///
/// Every variant maps to a stable machine-readable code (see [`CoreError::code`]).
/// Messages are safe to show to callers; internal detail belongs in logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Storage error")]
    Storage,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable error code surfaced to API callers.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::MalformedInput(_) => "MALFORMED_INPUT",
            CoreError::MissingField(_) => "MISSING_FIELD",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::InvalidEmail(_) => "INVALID_EMAIL",
            CoreError::InvalidUsername(_) => "INVALID_USERNAME",
            CoreError::WeakPassword(_) => "WEAK_PASSWORD",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::InvalidCredentials => "INVALID_CREDENTIALS",
            CoreError::Storage => "STORAGE_ERROR",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
