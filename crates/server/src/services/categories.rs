//! Category service.
//!
//! CRUD over a user's recipe categories plus the default set every new
//! account starts with.

use sqlx::PgPool;
use thiserror::Error;

use spoonit_core::{Category, CategoryIcon, CategoryId, DEFAULT_CATEGORIES, UserId};

use crate::db::RepositoryError;
use crate::db::categories::CategoryRepository;

/// Maximum category name length.
const MAX_NAME_LENGTH: usize = 50;

/// Errors that can occur in category operations.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// Invalid category name.
    #[error("invalid category name: {0}")]
    InvalidName(String),

    /// The user already has a category with this name.
    #[error("category already exists")]
    AlreadyExists,

    /// Category not found (or not owned by the caller).
    #[error("category not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Category service.
pub struct CategoryService<'a> {
    categories: CategoryRepository<'a>,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
        }
    }

    /// All of a user's categories, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Repository` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Category>, CategoryError> {
        Ok(self.categories.list_for_user(user_id).await?)
    }

    /// Create a category with a validated name.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::InvalidName` if the name is empty or too long.
    /// Returns `CategoryError::AlreadyExists` on a duplicate name.
    pub async fn create(
        &self,
        user_id: UserId,
        name: &str,
        icon: CategoryIcon,
    ) -> Result<Category, CategoryError> {
        let name = validate_name(name)?;

        self.categories
            .create(user_id, name, icon)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CategoryError::AlreadyExists,
                other => CategoryError::Repository(other),
            })
    }

    /// Delete a category. Recipes referencing it become uncategorized
    /// rather than deleted or recategorized.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the category doesn't exist or
    /// isn't owned by the caller.
    pub async fn delete(&self, user_id: UserId, id: CategoryId) -> Result<(), CategoryError> {
        self.categories
            .delete(user_id, id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CategoryError::NotFound,
                other => CategoryError::Repository(other),
            })
    }

    /// Seed the default categories for a new account.
    ///
    /// Idempotent: names the user already has are skipped.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Repository` if an insert fails.
    pub async fn seed_defaults(&self, user_id: UserId) -> Result<(), CategoryError> {
        for default in DEFAULT_CATEGORIES {
            match self.categories.create(user_id, default.name, default.icon).await {
                Ok(_) | Err(RepositoryError::Conflict(_)) => {}
                Err(other) => return Err(other.into()),
            }
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<&str, CategoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CategoryError::InvalidName("name is empty".to_owned()));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(CategoryError::InvalidName(format!(
            "name exceeds {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  Dinner ").unwrap(), "Dinner");
    }

    #[test]
    fn test_validate_name_rejects_empty() {
        assert!(matches!(
            validate_name("   "),
            Err(CategoryError::InvalidName(_))
        ));
    }

    #[test]
    fn test_validate_name_rejects_overlong() {
        let name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            validate_name(&name),
            Err(CategoryError::InvalidName(_))
        ));
    }
}
