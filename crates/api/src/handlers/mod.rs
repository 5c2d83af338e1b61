pub mod stories;
pub mod users;
