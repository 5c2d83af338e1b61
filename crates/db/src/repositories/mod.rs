//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod rating_repo;
pub mod review_repo;
pub mod story_repo;
pub mod user_repo;

pub use rating_repo::RatingRepo;
pub use review_repo::ReviewRepo;
pub use story_repo::StoryRepo;
pub use user_repo::UserRepo;
