//! Account service: user creation and credential checks.
//!
//! The service owns a handle to the connection pool and applies every
//! account rule before anything is written. Connections are checked out of
//! the pool per operation, never held between requests.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storyhub_core::account::{require, validate_password_strength, validate_username};
use storyhub_core::email::{self, MailDomainResolver, SystemResolver};
use storyhub_core::error::CoreError;
use storyhub_core::types::DbId;
use storyhub_db::models::user::CreateUser;
use storyhub_db::repositories::user_repo::{UQ_EMAIL, UQ_PROFILE_PICTURE, UQ_USERNAME};
use storyhub_db::repositories::UserRepo;
use storyhub_db::DbPool;

use crate::auth::password::{hash_password, verify_password};
use crate::db_errors::{storage, unique_violation};

pub const USERNAME_TAKEN: &str = "username taken";
pub const EMAIL_TAKEN: &str = "email taken";
pub const PROFILE_PICTURE_TAKEN: &str = "profile picture taken";

/// Default upper bound on the email domain lookup.
const DEFAULT_DNS_TIMEOUT_SECS: u64 = 5;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Account rules that vary by deployment.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Resolve the email domain before accepting a new account.
    pub check_deliverability: bool,
    /// Upper bound on the domain lookup, in seconds.
    pub dns_timeout_secs: u64,
}

impl AccountConfig {
    /// Load account configuration from environment variables.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `EMAIL_CHECK_DELIVERABILITY` | `true`  |
    /// | `EMAIL_DNS_TIMEOUT_SECS`     | `5`     |
    pub fn from_env() -> Self {
        let check_deliverability: bool = std::env::var("EMAIL_CHECK_DELIVERABILITY")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("EMAIL_CHECK_DELIVERABILITY must be true or false");

        let dns_timeout_secs: u64 = std::env::var("EMAIL_DNS_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_DNS_TIMEOUT_SECS.to_string())
            .parse()
            .expect("EMAIL_DNS_TIMEOUT_SECS must be a valid u64");

        Self {
            check_deliverability,
            dns_timeout_secs,
        }
    }

    fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// Fields accepted when creating an account. Every field is optional at the
/// type level so that absent fields surface as `MissingField` rather than as
/// a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct NewAccount {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

/// Login credentials.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Identity of a freshly created account.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedAccount {
    pub id: DbId,
    pub username: String,
    /// Canonical form, as stored.
    pub email: String,
}

/// A verified identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Authenticated {
    pub user_id: DbId,
}

/// Decode a JSON value into a structured request record.
///
/// Anything other than a JSON object, or an object whose fields have the
/// wrong types, is `MalformedInput`.
pub fn parse_record<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, CoreError> {
    if !value.is_object() {
        return Err(CoreError::MalformedInput(
            "Request body must be a JSON object".into(),
        ));
    }
    serde_json::from_value(value).map_err(|e| CoreError::MalformedInput(e.to_string()))
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Account operations over the user store.
#[derive(Clone)]
pub struct AccountService {
    pool: DbPool,
    config: AccountConfig,
    resolver: Arc<dyn MailDomainResolver>,
}

impl AccountService {
    /// Service using the host's DNS configuration for deliverability checks.
    pub fn new(pool: DbPool, config: AccountConfig) -> Self {
        Self::with_resolver(pool, config, Arc::new(SystemResolver::from_system_conf()))
    }

    pub fn with_resolver(
        pool: DbPool,
        config: AccountConfig,
        resolver: Arc<dyn MailDomainResolver>,
    ) -> Self {
        Self {
            pool,
            config,
            resolver,
        }
    }

    /// Create a user account.
    ///
    /// Checks run in a fixed order and the first failure wins: required
    /// fields, username taken, email taken, email validity, username
    /// length, password strength. The stored email is the canonical form.
    pub async fn create_user(&self, input: NewAccount) -> Result<CreatedAccount, CoreError> {
        let username = require("username", input.username.as_deref())?;
        let password = require("password", input.password.as_deref())?;
        let raw_email = require("email", input.email.as_deref())?;

        if UserRepo::find_by_username(&self.pool, username)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(CoreError::Conflict(USERNAME_TAKEN.into()));
        }

        // Stored emails are canonical, so compare in that form when possible.
        let lookup = canonical_or_raw(raw_email);
        if UserRepo::find_by_email(&self.pool, &lookup)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(CoreError::Conflict(EMAIL_TAKEN.into()));
        }

        let email = self.validate_email(raw_email).await?;
        validate_username(username)?;
        validate_password_strength(password)?;

        let password_hash = hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            CoreError::Internal("Password hashing failed".into())
        })?;

        let create = CreateUser {
            username: username.to_string(),
            password_hash,
            email,
            name: input.name,
            bio: input.bio,
            profile_picture: input.profile_picture,
        };

        let user = UserRepo::create(&self.pool, &create)
            .await
            .map_err(classify_insert_error)?;

        tracing::info!(user_id = user.id, username = %user.username, "User created");

        Ok(CreatedAccount {
            id: user.id,
            username: user.username,
            email: user.email,
        })
    }

    /// Check an email/password pair against the stored hash.
    pub async fn authenticate(&self, credentials: Credentials) -> Result<Authenticated, CoreError> {
        let raw_email = require("email", credentials.email.as_deref())?;
        let password = require("password", credentials.password.as_deref())?;

        let lookup = canonical_or_raw(raw_email);

        let user = UserRepo::find_by_email(&self.pool, &lookup)
            .await
            .map_err(storage)?
            .ok_or(CoreError::NotFound { entity: "User" })?;

        let valid = verify_password(password, &user.password_hash).map_err(|e| {
            tracing::error!(user_id = user.id, error = %e, "Password verification error");
            CoreError::Internal("Password verification failed".into())
        })?;

        if !valid {
            tracing::warn!(user_id = user.id, "Rejected login with wrong password");
            return Err(CoreError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, "User authenticated");
        Ok(Authenticated { user_id: user.id })
    }

    /// End a session. Sessions are not tracked by this service, so there is
    /// nothing to revoke.
    pub async fn logout(&self) {
        tracing::debug!("Logout requested, no session state to clear");
    }

    async fn validate_email(&self, raw: &str) -> Result<String, CoreError> {
        let canonical = email::canonicalize(raw)?;
        if self.config.check_deliverability {
            email::check_deliverability(
                self.resolver.as_ref(),
                email::domain_of(&canonical),
                self.config.dns_timeout(),
            )
            .await?;
        }
        Ok(canonical)
    }
}

/// Canonical form of an email for lookups. Input that does not parse is used
/// as given, so a lookup with it simply misses.
fn canonical_or_raw(raw: &str) -> String {
    email::canonicalize(raw).unwrap_or_else(|_| raw.to_string())
}

/// Map an insert failure to a conflict when a concurrent writer claimed the
/// same username, email, or picture first.
fn classify_insert_error(err: sqlx::Error) -> CoreError {
    let message = match unique_violation(&err) {
        Some(UQ_USERNAME) => Some(USERNAME_TAKEN),
        Some(UQ_EMAIL) => Some(EMAIL_TAKEN),
        Some(UQ_PROFILE_PICTURE) => Some(PROFILE_PICTURE_TAKEN),
        _ => None,
    };
    match message {
        Some(message) => CoreError::Conflict(message.into()),
        None => storage(err),
    }
}
