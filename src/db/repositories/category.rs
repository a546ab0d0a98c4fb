use crate::entities::{books, categories, prelude::*};
use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// Result of a guarded category delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteCategoryOutcome {
    Deleted,
    NotFound,
    /// At least one book still references the category; nothing was deleted.
    HasBooks(u64),
}

pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<categories::Model>> {
        Categories::find()
            .order_by_asc(categories::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list categories")
    }

    pub async fn get(&self, id: i32) -> Result<Option<categories::Model>> {
        Categories::find_by_id(id)
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query category {id}"))
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    pub async fn create(&self, name: &str, actor: &str) -> Result<categories::Model> {
        categories::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
            created_by: Set(Some(actor.to_string())),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create category")
    }

    /// Deletes the category only if no book references it.
    ///
    /// Existence check, reference count and delete share one transaction.
    pub async fn delete_if_unused(&self, id: i32) -> Result<DeleteCategoryOutcome> {
        let txn = self.conn.begin().await?;

        if Categories::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(DeleteCategoryOutcome::NotFound);
        }

        let book_count = Books::find()
            .filter(books::Column::CategoryId.eq(id))
            .count(&txn)
            .await?;

        if book_count > 0 {
            return Ok(DeleteCategoryOutcome::HasBooks(book_count));
        }

        Categories::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(DeleteCategoryOutcome::Deleted)
    }
}
