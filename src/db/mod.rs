use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{AuthConfig, DatabaseConfig, SecurityConfig};
use crate::domain::ValidBook;
use crate::entities::{books, categories};
use crate::services::SYSTEM_ACTOR;

pub mod migrator;
pub mod repositories;

pub use repositories::book::{BookRow, BookWriteOutcome};
pub use repositories::category::DeleteCategoryOutcome;
pub use repositories::user::User;

/// Handle to the relational store. Cheap to clone; every clone shares the
/// same connection pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database at {}", config.redacted_url());
        Self::with_pool_options(
            &config.connection_url(),
            config.max_connections,
            config.min_connections,
            Duration::from_secs(config.connect_timeout_seconds),
        )
        .await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if let Some(path_str) = db_url.strip_prefix("sqlite:")
            && !path_str.starts_with(":memory:")
        {
            let path_str = path_str.trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(connect_timeout)
            .acquire_timeout(connect_timeout)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    fn book_repo(&self) -> repositories::book::BookRepository {
        repositories::book::BookRepository::new(self.conn.clone())
    }

    // Users

    pub async fn verify_user_password(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo()
            .verify_password(username, password, security)
            .await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        created_by: &str,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(username, password, created_by, security)
            .await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    /// Seeds the administrative credential when the user table is empty.
    ///
    /// Returns `true` when a user was created.
    pub async fn bootstrap_admin(
        &self,
        auth: &AuthConfig,
        security: &SecurityConfig,
    ) -> Result<bool> {
        if self.count_users().await? > 0 {
            return Ok(false);
        }

        let (password, generated) = match auth.admin_password.as_deref() {
            Some(p) if !p.is_empty() => (p.to_string(), false),
            _ => (repositories::user::generate_password(), true),
        };

        self.create_user(&auth.admin_username, &password, SYSTEM_ACTOR, security)
            .await?;

        if generated {
            warn!(
                username = %auth.admin_username,
                "Default admin user created with generated password: {password} (set ADMIN_PASSWORD to choose one)"
            );
        } else {
            info!(username = %auth.admin_username, "Default admin user created");
        }

        Ok(true)
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<categories::Model>> {
        self.category_repo().list().await
    }

    pub async fn get_category(&self, id: i32) -> Result<Option<categories::Model>> {
        self.category_repo().get(id).await
    }

    pub async fn category_exists(&self, id: i32) -> Result<bool> {
        self.category_repo().exists(id).await
    }

    pub async fn create_category(&self, name: &str, actor: &str) -> Result<categories::Model> {
        self.category_repo().create(name, actor).await
    }

    pub async fn delete_category(&self, id: i32) -> Result<DeleteCategoryOutcome> {
        self.category_repo().delete_if_unused(id).await
    }

    // Books

    pub async fn list_books(&self) -> Result<Vec<BookRow>> {
        self.book_repo().list().await
    }

    pub async fn list_books_by_category(&self, category_id: i32) -> Result<Vec<books::Model>> {
        self.book_repo().list_by_category(category_id).await
    }

    pub async fn get_book(&self, id: i32) -> Result<Option<BookRow>> {
        self.book_repo().get(id).await
    }

    pub async fn create_book(&self, book: &ValidBook, actor: &str) -> Result<BookWriteOutcome> {
        self.book_repo().create(book, actor).await
    }

    pub async fn update_book(
        &self,
        id: i32,
        book: &ValidBook,
        actor: &str,
    ) -> Result<BookWriteOutcome> {
        self.book_repo().update(id, book, actor).await
    }

    pub async fn delete_book(&self, id: i32) -> Result<bool> {
        self.book_repo().delete(id).await
    }
}
