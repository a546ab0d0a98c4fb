//! Domain service for books and categories.
//!
//! Validation runs here before any write. Callers pass the acting username
//! explicitly; the service has no notion of a current request.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{BookRequest, ValidationErrors};
use crate::entities::{books, categories};

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The operation would break a reference, e.g. deleting a category that
    /// books still point at.
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn book_not_found(id: i32) -> Self {
        Self::NotFound(format!("Book {id} not found"))
    }

    pub fn category_not_found(id: i32) -> Self {
        Self::NotFound(format!("Category {id} not found"))
    }
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        if err.downcast_ref::<sea_orm::DbErr>().is_some() {
            Self::Database(format!("{err:#}"))
        } else {
            Self::Internal(format!("{err:#}"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
}

impl From<categories::Model> for CategoryRef {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            created_by: model.created_by,
            modified_at: model.modified_at,
            modified_by: model.modified_by,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub release_year: i32,
    pub price: i32,
    pub total_page: i32,
    /// `"tebal"` or `"tipis"`, derived from `total_page`.
    pub thickness: String,
    pub category_id: Option<i32>,
    /// The referenced category, when the book has one.
    pub category: Option<CategoryRef>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl Book {
    #[must_use]
    pub fn from_row(book: books::Model, category: Option<categories::Model>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            description: book.description,
            image_url: book.image_url,
            release_year: book.release_year,
            price: book.price,
            total_page: book.total_page,
            thickness: book.thickness,
            category_id: book.category_id,
            category: category.map(CategoryRef::from),
            created_at: book.created_at,
            created_by: book.created_by,
            modified_at: book.modified_at,
            modified_by: book.modified_by,
        }
    }
}

/// Domain service trait for catalog operations.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// All books with their category, ordered by id.
    async fn list_books(&self) -> Result<Vec<Book>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the book does not exist.
    async fn get_book(&self, id: i32) -> Result<Book, CatalogError>;

    /// Validates the payload, derives `thickness` and inserts.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] listing every rejected field,
    /// including a `category_id` that names no category.
    async fn create_book(&self, payload: BookRequest, actor: &str) -> Result<Book, CatalogError>;

    /// Replaces an existing book. Validation is identical to create.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if the book does not exist
    /// - [`CatalogError::Validation`] as for [`CatalogService::create_book`]
    async fn update_book(
        &self,
        id: i32,
        payload: BookRequest,
        actor: &str,
    ) -> Result<Book, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the book does not exist.
    async fn delete_book(&self, id: i32) -> Result<(), CatalogError>;

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] for an empty or oversized name.
    async fn create_category(
        &self,
        name: Option<&str>,
        actor: &str,
    ) -> Result<Category, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the category does not exist.
    async fn get_category(&self, id: i32) -> Result<Category, CatalogError>;

    /// Deletes a category that no book references.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if the category does not exist
    /// - [`CatalogError::Conflict`] while any book references it
    async fn delete_category(&self, id: i32) -> Result<(), CatalogError>;

    /// Books in one category, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the category does not exist.
    async fn list_books_by_category(&self, category_id: i32) -> Result<Vec<Book>, CatalogError>;
}
