use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users;

/// Hashes verified against when the username is unknown, so a miss costs the
/// same as a wrong password. Keyed by Argon2 memory, time and parallelism.
static DUMMY_HASHES: LazyLock<Mutex<HashMap<(u32, u32, u32), String>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            created_at: model.created_at,
            created_by: model.created_by,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<u64> {
        users::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }

    /// Verify password for a user, returning the user on success.
    ///
    /// Unknown usernames and wrong passwords both yield `None`, and both pay
    /// for one Argon2 verification at the configured cost.
    /// Runs on `spawn_blocking` because Argon2 is CPU-intensive.
    pub async fn verify_password(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password = password.to_string();
        let config = config.clone();
        let is_valid = task::spawn_blocking(move || {
            let hash = match stored_hash {
                Some(hash) => hash,
                None => dummy_hash(&config)?,
            };
            verify_password(&password, &hash)
        })
        .await
        .context("Password verification task panicked")??;

        Ok(user.filter(|_| is_valid).map(User::from))
    }

    /// Hashes `password` and inserts a new credential.
    ///
    /// A duplicate username surfaces as the store's unique-constraint error
    /// (reachable through `anyhow::Error::downcast_ref::<sea_orm::DbErr>`).
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        created_by: &str,
        config: &SecurityConfig,
    ) -> Result<User> {
        let password = password.to_string();
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let model = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
            created_by: Set(Some(created_by.to_string())),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to create user: {username}"))?;

        Ok(User::from(model))
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Dummy hash for `config`, computed once per parameter set. Blocking.
fn dummy_hash(config: &SecurityConfig) -> Result<String> {
    let key = (
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
    );

    if let Some(hash) = DUMMY_HASHES
        .lock()
        .ok()
        .and_then(|hashes| hashes.get(&key).cloned())
    {
        return Ok(hash);
    }

    let hash = hash_password("not-a-real-password", config)?;
    if let Ok(mut hashes) = DUMMY_HASHES.lock() {
        hashes.entry(key).or_insert_with(|| hash.clone());
    }
    Ok(hash)
}

/// Check `password` against a PHC hash string. Parameters are read from the
/// hash itself, so hashes made with older settings still verify.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a random password (32 character hex string)
#[must_use]
pub fn generate_password() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();

    bytes.iter().fold(String::with_capacity(32), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("correct horse", &fast_config()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same", &fast_config()).unwrap();
        let b = hash_password("same", &fast_config()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn dummy_hash_follows_configured_cost() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 2048,
            argon2_time_cost: 2,
            argon2_parallelism: 1,
        };

        let hash = dummy_hash(&config).unwrap();
        assert!(hash.contains("m=2048,t=2,p=1"), "{hash}");
        assert_eq!(dummy_hash(&config).unwrap(), hash);

        let fast = dummy_hash(&fast_config()).unwrap();
        assert!(fast.contains("m=1024,t=1,p=1"), "{fast}");
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }

    #[test]
    fn generated_passwords_are_random_hex() {
        let a = generate_password();
        let b = generate_password();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
