//! Translation of `sqlx` failures into domain errors.
//!
//! Only constraint violations the services expect are turned into caller
//! facing errors. Everything else is logged and collapsed to
//! [`CoreError::Storage`] so no driver detail reaches a response.

use storyhub_core::error::CoreError;

/// PostgreSQL SQLSTATE for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Name of the unique constraint `err` violated, if it is a unique violation.
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    violated_constraint(err, UNIQUE_VIOLATION)
}

/// Name of the foreign key `err` violated, if it is a foreign key violation.
pub(crate) fn foreign_key_violation(err: &sqlx::Error) -> Option<&str> {
    violated_constraint(err, FOREIGN_KEY_VIOLATION)
}

/// Log an unexpected store failure and return the sanitized domain error.
pub(crate) fn storage(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Storage failure");
    CoreError::Storage
}

fn violated_constraint<'e>(err: &'e sqlx::Error, sqlstate: &str) -> Option<&'e str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(sqlstate) => {
            Some(db_err.constraint().unwrap_or("unknown"))
        }
        _ => None,
    }
}
