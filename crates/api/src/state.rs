use std::sync::Arc;

use crate::account::AccountService;
use crate::config::ServerConfig;
use crate::stories::StoryService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: storyhub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Account creation and login.
    pub accounts: AccountService,
    /// Story reads.
    pub stories: StoryService,
}

impl AppState {
    /// Wire the services around a pool and configuration.
    pub fn new(pool: storyhub_db::DbPool, config: ServerConfig) -> Self {
        let accounts = AccountService::new(pool.clone(), config.account.clone());
        let stories = StoryService::new(pool.clone());
        Self {
            pool,
            config: Arc::new(config),
            accounts,
            stories,
        }
    }
}
