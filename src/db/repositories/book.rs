use crate::domain::ValidBook;
use crate::entities::{books, categories, prelude::*};
use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// A book joined with its category, if it still has one.
pub type BookRow = (books::Model, Option<categories::Model>);

/// Result of a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookWriteOutcome {
    Written(BookRow),
    /// Update target does not exist.
    NotFound,
    /// `category_id` names a category that does not exist.
    MissingCategory(i32),
}

pub struct BookRepository {
    conn: DatabaseConnection,
}

impl BookRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<BookRow>> {
        Books::find()
            .find_also_related(Categories)
            .order_by_asc(books::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list books")
    }

    pub async fn list_by_category(&self, category_id: i32) -> Result<Vec<books::Model>> {
        Books::find()
            .filter(books::Column::CategoryId.eq(category_id))
            .order_by_asc(books::Column::Id)
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to list books for category {category_id}"))
    }

    pub async fn get(&self, id: i32) -> Result<Option<BookRow>> {
        Books::find_by_id(id)
            .find_also_related(Categories)
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query book {id}"))
    }

    pub async fn create(&self, book: &ValidBook, actor: &str) -> Result<BookWriteOutcome> {
        let txn = self.conn.begin().await?;

        let category = match lookup_category(&txn, book.category_id).await? {
            Ok(category) => category,
            Err(missing) => return Ok(BookWriteOutcome::MissingCategory(missing)),
        };

        let model = books::ActiveModel {
            title: Set(book.title.clone()),
            description: Set(book.description.clone()),
            image_url: Set(book.image_url.clone()),
            release_year: Set(book.release_year),
            price: Set(book.price),
            total_page: Set(book.total_page),
            thickness: Set(book.thickness.as_str().to_string()),
            category_id: Set(book.category_id),
            created_at: Set(Utc::now()),
            created_by: Set(Some(actor.to_string())),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert book")?;

        txn.commit().await?;
        Ok(BookWriteOutcome::Written((model, category)))
    }

    /// Replaces every client-settable field of an existing book.
    ///
    /// Existence check and write share one transaction.
    pub async fn update(&self, id: i32, book: &ValidBook, actor: &str) -> Result<BookWriteOutcome> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Books::find_by_id(id).one(&txn).await? else {
            return Ok(BookWriteOutcome::NotFound);
        };

        let category = match lookup_category(&txn, book.category_id).await? {
            Ok(category) => category,
            Err(missing) => return Ok(BookWriteOutcome::MissingCategory(missing)),
        };

        let mut active: books::ActiveModel = existing.into();
        active.title = Set(book.title.clone());
        active.description = Set(book.description.clone());
        active.image_url = Set(book.image_url.clone());
        active.release_year = Set(book.release_year);
        active.price = Set(book.price);
        active.total_page = Set(book.total_page);
        active.thickness = Set(book.thickness.as_str().to_string());
        active.category_id = Set(book.category_id);
        active.modified_at = Set(Some(Utc::now()));
        active.modified_by = Set(Some(actor.to_string()));

        let model = active
            .update(&txn)
            .await
            .with_context(|| format!("Failed to update book {id}"))?;

        txn.commit().await?;
        Ok(BookWriteOutcome::Written((model, category)))
    }

    /// Returns `false` when no row had this id.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Books::delete_by_id(id)
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to delete book {id}"))?;

        Ok(result.rows_affected > 0)
    }
}

/// `Ok(Ok(None))` for no category, `Ok(Err(id))` when the id is dangling.
async fn lookup_category(
    txn: &DatabaseTransaction,
    category_id: Option<i32>,
) -> Result<std::result::Result<Option<categories::Model>, i32>> {
    let Some(id) = category_id else {
        return Ok(Ok(None));
    };

    let category = Categories::find_by_id(id).one(txn).await?;
    Ok(category.map(Some).ok_or(id))
}
