//! Domain service for authentication and user registration.
//!
//! Handles login, registration and bearer-token verification.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::ValidationErrors;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. The two are indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username '{0}' is already taken")]
    DuplicateIdentity(String),

    /// Missing, malformed, badly signed or expired token.
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        if err.downcast_ref::<sea_orm::DbErr>().is_some() {
            Self::Database(format!("{err:#}"))
        } else {
            Self::Internal(format!("{err:#}"))
        }
    }
}

/// Caller identity carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// A newly created credential.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub user_id: i32,
    pub username: String,
}

/// Recorded as `created_by` for credentials nobody signed in to create:
/// self-registration and the seeded admin.
pub const SYSTEM_ACTOR: &str = "system";

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and issues a signed session token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user or a
    /// wrong password.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Creates a new credential. `actor` is recorded as its creator.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] for an empty or oversized username, or an empty password
    /// - [`AuthError::DuplicateIdentity`] when the username is taken
    async fn register(
        &self,
        username: &str,
        password: &str,
        actor: &str,
    ) -> Result<RegisteredUser, AuthError>;

    /// Verifies a bearer token. Pure function of the token; the store is
    /// not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] for any invalid token.
    fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError>;
}
