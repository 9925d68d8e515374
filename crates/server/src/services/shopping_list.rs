//! Shopping list service.
//!
//! Adds carry two invariants: the list is capped at [`MAX_ITEMS`] entries
//! per user, and duplicates are rejected on a whitespace/case-normalized
//! key so "Olive Oil" and " olive  oil " count as the same ingredient.

use sqlx::PgPool;
use thiserror::Error;

use spoonit_core::{ShoppingItemId, UserId};

use crate::db::RepositoryError;
use crate::db::shopping_list::ShoppingListRepository;
use crate::models::shopping_list::ShoppingListItem;

/// Maximum entries per user's list.
pub const MAX_ITEMS: i64 = 100;

/// Maximum item text length.
const MAX_TEXT_LENGTH: usize = 200;

/// Errors that can occur in shopping list operations.
#[derive(Debug, Error)]
pub enum ShoppingListError {
    /// Invalid item text.
    #[error("invalid item: {0}")]
    InvalidItem(String),

    /// The same (normalized) item is already on the list.
    #[error("item already on the list")]
    Duplicate,

    /// The list is at capacity.
    #[error("shopping list is full ({MAX_ITEMS} items)")]
    ListFull,

    /// Item not found (or not owned by the caller).
    #[error("item not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Shopping list service.
pub struct ShoppingListService<'a> {
    items: ShoppingListRepository<'a>,
}

impl<'a> ShoppingListService<'a> {
    /// Create a new shopping list service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            items: ShoppingListRepository::new(pool),
        }
    }

    /// A user's list, oldest entry first.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingListError::Repository` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<ShoppingListItem>, ShoppingListError> {
        Ok(self.items.list_for_user(user_id).await?)
    }

    /// Add an item to the list.
    ///
    /// The repository runs the capacity check and the insert in one
    /// transaction, and the unique index handles dedup, so concurrent
    /// adds can neither overfill the list nor land the same item twice.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingListError::InvalidItem` if the text is empty or too long.
    /// Returns `ShoppingListError::ListFull` at [`MAX_ITEMS`] entries.
    /// Returns `ShoppingListError::Duplicate` if the normalized text is taken.
    pub async fn add(
        &self,
        user_id: UserId,
        text: &str,
    ) -> Result<ShoppingListItem, ShoppingListError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ShoppingListError::InvalidItem("item is empty".to_owned()));
        }
        if text.len() > MAX_TEXT_LENGTH {
            return Err(ShoppingListError::InvalidItem(format!(
                "item exceeds {MAX_TEXT_LENGTH} characters"
            )));
        }

        let key = normalized_key(text);
        self.items
            .insert(user_id, text, &key, MAX_ITEMS)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ShoppingListError::Duplicate,
                other => ShoppingListError::Repository(other),
            })?
            .ok_or(ShoppingListError::ListFull)
    }

    /// Remove one item from the list.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingListError::NotFound` if the item doesn't exist or
    /// isn't owned by the caller.
    pub async fn remove(
        &self,
        user_id: UserId,
        id: ShoppingItemId,
    ) -> Result<(), ShoppingListError> {
        self.items.delete(user_id, id).await.map_err(|e| match e {
            RepositoryError::NotFound => ShoppingListError::NotFound,
            other => ShoppingListError::Repository(other),
        })
    }

    /// Empty the list. Returns how many items were removed.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingListError::Repository` if the delete fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, ShoppingListError> {
        Ok(self.items.clear(user_id).await?)
    }
}

/// Dedup key: lowercased, inner whitespace collapsed to single spaces.
#[must_use]
pub fn normalized_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_key_collapses_whitespace() {
        assert_eq!(normalized_key("  Olive   Oil "), "olive oil");
    }

    #[test]
    fn test_normalized_key_case_insensitive() {
        assert_eq!(normalized_key("FLOUR"), normalized_key("flour"));
    }

    #[test]
    fn test_normalized_key_distinct_items_stay_distinct() {
        assert_ne!(normalized_key("olive oil"), normalized_key("oliveoil"));
    }
}
