//! Account field rules applied before a user record is written.

use crate::error::CoreError;

/// Shortest accepted username, in characters.
pub const USERNAME_MIN_LEN: usize = 4;

/// Longest accepted username, in characters.
pub const USERNAME_MAX_LEN: usize = 19;

/// Minimum password length enforced on account creation.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Return the value of a required field, or `MissingField` when it is absent
/// or empty.
pub fn require<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, CoreError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::MissingField(field)),
    }
}

/// Check that a username is between [`USERNAME_MIN_LEN`] and
/// [`USERNAME_MAX_LEN`] characters long, both inclusive.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(CoreError::InvalidUsername(format!(
            "Username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// Check that a password meets the minimum length requirement.
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}
