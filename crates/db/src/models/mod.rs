//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod rating;
pub mod review;
pub mod story;
pub mod user;
