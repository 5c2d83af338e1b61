//! Storyhub API server library.
//!
//! Exposes the account and story services, configuration, state, error
//! handling, and routes so integration tests and the binary entrypoint can
//! both access them.

pub mod account;
pub mod auth;
pub mod config;
mod db_errors;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
pub mod stories;
