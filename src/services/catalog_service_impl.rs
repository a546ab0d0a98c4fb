//! `SeaORM` implementation of the `CatalogService` trait.

use crate::db::{BookWriteOutcome, DeleteCategoryOutcome, Store};
use crate::domain::{BookRequest, ValidBook, ValidationErrors, validate_category_name};
use crate::services::catalog_service::{Book, CatalogError, CatalogService, Category};
use async_trait::async_trait;

const CATEGORY_IN_USE: &str = "cannot delete category with existing books";

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Field rules plus the category reference check, reported together.
    async fn validate_book(&self, payload: &BookRequest) -> Result<ValidBook, CatalogError> {
        let (book, mut errors) = match payload.validate() {
            Ok(book) => (Some(book), ValidationErrors::default()),
            Err(errors) => (None, errors),
        };

        if let Some(category_id) = payload.category_id
            && category_id > 0
            && !self.store.category_exists(category_id).await?
        {
            errors.push("category_id", missing_category(category_id));
        }

        match book {
            Some(book) if errors.is_empty() => Ok(book),
            _ => Err(CatalogError::Validation(errors)),
        }
    }
}

fn missing_category(id: i32) -> String {
    format!("category {id} does not exist")
}

/// Category removed between validation and write.
fn category_vanished(id: i32) -> CatalogError {
    let mut errors = ValidationErrors::default();
    errors.push("category_id", missing_category(id));
    CatalogError::Validation(errors)
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_books(&self) -> Result<Vec<Book>, CatalogError> {
        let rows = self.store.list_books().await?;
        Ok(rows
            .into_iter()
            .map(|(book, category)| Book::from_row(book, category))
            .collect())
    }

    async fn get_book(&self, id: i32) -> Result<Book, CatalogError> {
        let (book, category) = self
            .store
            .get_book(id)
            .await?
            .ok_or_else(|| CatalogError::book_not_found(id))?;

        Ok(Book::from_row(book, category))
    }

    async fn create_book(&self, payload: BookRequest, actor: &str) -> Result<Book, CatalogError> {
        let valid = self.validate_book(&payload).await?;

        match self.store.create_book(&valid, actor).await? {
            BookWriteOutcome::Written((book, category)) => {
                tracing::info!(book_id = book.id, thickness = %book.thickness, "Book created");
                Ok(Book::from_row(book, category))
            }
            BookWriteOutcome::MissingCategory(id) => Err(category_vanished(id)),
            BookWriteOutcome::NotFound => Err(CatalogError::Internal(
                "insert reported a missing book".to_string(),
            )),
        }
    }

    async fn update_book(
        &self,
        id: i32,
        payload: BookRequest,
        actor: &str,
    ) -> Result<Book, CatalogError> {
        if self.store.get_book(id).await?.is_none() {
            return Err(CatalogError::book_not_found(id));
        }

        let valid = self.validate_book(&payload).await?;

        match self.store.update_book(id, &valid, actor).await? {
            BookWriteOutcome::Written((book, category)) => {
                tracing::info!(book_id = book.id, thickness = %book.thickness, "Book updated");
                Ok(Book::from_row(book, category))
            }
            BookWriteOutcome::NotFound => Err(CatalogError::book_not_found(id)),
            BookWriteOutcome::MissingCategory(category_id) => Err(category_vanished(category_id)),
        }
    }

    async fn delete_book(&self, id: i32) -> Result<(), CatalogError> {
        if !self.store.delete_book(id).await? {
            return Err(CatalogError::book_not_found(id));
        }

        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let categories = self.store.list_categories().await?;
        Ok(categories.into_iter().map(Category::from).collect())
    }

    async fn create_category(
        &self,
        name: Option<&str>,
        actor: &str,
    ) -> Result<Category, CatalogError> {
        let name = validate_category_name(name).map_err(CatalogError::Validation)?;

        let category = self.store.create_category(&name, actor).await?;
        tracing::info!(category_id = category.id, "Category created");

        Ok(Category::from(category))
    }

    async fn get_category(&self, id: i32) -> Result<Category, CatalogError> {
        self.store
            .get_category(id)
            .await?
            .map(Category::from)
            .ok_or_else(|| CatalogError::category_not_found(id))
    }

    async fn delete_category(&self, id: i32) -> Result<(), CatalogError> {
        match self.store.delete_category(id).await? {
            DeleteCategoryOutcome::Deleted => {
                tracing::info!(category_id = id, "Category deleted");
                Ok(())
            }
            DeleteCategoryOutcome::NotFound => Err(CatalogError::category_not_found(id)),
            DeleteCategoryOutcome::HasBooks(count) => {
                tracing::debug!(category_id = id, books = count, "Category still referenced");
                Err(CatalogError::Conflict(CATEGORY_IN_USE.to_string()))
            }
        }
    }

    async fn list_books_by_category(&self, category_id: i32) -> Result<Vec<Book>, CatalogError> {
        let category = self
            .store
            .get_category(category_id)
            .await?
            .ok_or_else(|| CatalogError::category_not_found(category_id))?;

        let books = self.store.list_books_by_category(category_id).await?;
        Ok(books
            .into_iter()
            .map(|book| Book::from_row(book, Some(category.clone())))
            .collect())
    }
}
