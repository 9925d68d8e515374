//! Shopping list repository for database operations.
//!
//! Each row carries the display text plus a `normalized_text` column used
//! purely as the dedup key, with a unique (user, normalized text) index.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use spoonit_core::{ShoppingItemId, UserId};

use super::RepositoryError;
use crate::models::shopping_list::ShoppingListItem;

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i32,
    user_id: i32,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<ItemRow> for ShoppingListItem {
    fn from(row: ItemRow) -> Self {
        Self {
            id: ShoppingItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            text: row.text,
            created_at: row.created_at,
        }
    }
}

/// Repository for shopping list database operations.
pub struct ShoppingListRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShoppingListRepository<'a> {
    /// Create a new shopping list repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All items on a user's list, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ShoppingListItem>, RepositoryError> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, user_id, text, created_at FROM shopping_list_item
             WHERE user_id = $1
             ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ShoppingListItem::from).collect())
    }

    /// Insert an item with its precomputed dedup key, refusing once the
    /// list holds `max_items` entries. Returns `None` when the list is
    /// full.
    ///
    /// The capacity check and the insert run in one transaction holding
    /// the user's row lock, so concurrent adds can't push past the cap.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an item with the same
    /// normalized text already exists for this user.
    pub async fn insert(
        &self,
        user_id: UserId,
        text: &str,
        normalized_text: &str,
        max_items: i64,
    ) -> Result<Option<ShoppingListItem>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM app_user WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let (count,): (i64,) =
            sqlx::query_as("SELECT count(*) FROM shopping_list_item WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;
        if count >= max_items {
            return Ok(None);
        }

        let row: ItemRow = sqlx::query_as(
            "INSERT INTO shopping_list_item (user_id, text, normalized_text)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, text, created_at",
        )
        .bind(user_id)
        .bind(text)
        .bind(normalized_text)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "item already on the list"))?;

        tx.commit().await?;

        Ok(Some(row.into()))
    }

    /// Delete an owned item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist or
    /// isn't owned by `user_id`.
    pub async fn delete(
        &self,
        user_id: UserId,
        id: ShoppingItemId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shopping_list_item WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove every item from a user's list. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shopping_list_item WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
