//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::{ValidationErrors, validate_username};
use crate::services::auth_service::{
    AuthError, AuthService, AuthUser, LoginResult, RegisteredUser,
};
use crate::services::token::TokenSigner;
use async_trait::async_trait;
use sea_orm::SqlErr;

pub struct SeaOrmAuthService {
    store: Store,
    signer: TokenSigner,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, signer: TokenSigner, security: SecurityConfig) -> Self {
        Self {
            store,
            signer,
            security,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let user = self
            .store
            .verify_user_password(username, password, &self.security)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let signed = self
            .signer
            .sign(&user.username, user.id)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))?;

        tracing::info!(username = %user.username, "User logged in");

        Ok(LoginResult {
            token: signed.token,
            expires_at: signed.expires_at,
        })
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        actor: &str,
    ) -> Result<RegisteredUser, AuthError> {
        let mut errors = match validate_username(username) {
            Ok(_) => ValidationErrors::default(),
            Err(errors) => errors,
        };
        if password.is_empty() {
            errors.push("password", "password is required");
        }
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let user = self
            .store
            .create_user(username, password, actor, &self.security)
            .await
            .map_err(|err| {
                let duplicate = err
                    .downcast_ref::<sea_orm::DbErr>()
                    .and_then(sea_orm::DbErr::sql_err)
                    .is_some_and(|e| matches!(e, SqlErr::UniqueConstraintViolation(_)));

                if duplicate {
                    AuthError::DuplicateIdentity(username.to_string())
                } else {
                    AuthError::from(err)
                }
            })?;

        tracing::info!(username = %user.username, created_by = %actor, "User registered");

        Ok(RegisteredUser {
            user_id: user.id,
            username: user.username,
        })
    }

    fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.signer.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AuthError::Unauthenticated
        })?;

        Ok(AuthUser {
            user_id: claims.uid,
            username: claims.sub,
        })
    }
}
