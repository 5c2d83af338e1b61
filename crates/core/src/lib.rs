//! Pure domain logic for the storyhub backend.
//!
//! Nothing in this crate touches the database. The account rules, email
//! canonicalization, and story field checks live here so the service layer
//! and tests can share them.

pub mod account;
pub mod email;
pub mod error;
pub mod story;
pub mod types;
