//! Category repository for database operations.
//!
//! Category names are unique per user (case-insensitive, enforced by a
//! functional unique index). Deleting a category leaves its recipes
//! uncategorized: the `recipe.category_id` foreign key is `ON DELETE SET
//! NULL`.

use sqlx::PgPool;

use spoonit_core::{Category, CategoryIcon, CategoryId, UserId};

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    user_id: i32,
    name: String,
    icon: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.name,
            // Unknown keys from older writes degrade to the generic icon
            icon: CategoryIcon::parse_lossy(&row.icon),
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories owned by a user, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            "SELECT id, user_id, name, icon FROM category WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Get a category by ID, owner-scoped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
        id: CategoryId,
    ) -> Result<Option<Category>, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            "SELECT id, user_id, name, icon FROM category WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a
    /// category with this name (case-insensitive).
    pub async fn create(
        &self,
        user_id: UserId,
        name: &str,
        icon: CategoryIcon,
    ) -> Result<Category, RepositoryError> {
        let row: CategoryRow = sqlx::query_as(
            "INSERT INTO category (user_id, name, icon)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, name, icon",
        )
        .bind(user_id)
        .bind(name)
        .bind(icon.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "category name already exists"))?;

        Ok(row.into())
    }

    /// Delete an owned category. Referencing recipes become uncategorized.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist
    /// or isn't owned by `user_id`.
    pub async fn delete(&self, user_id: UserId, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
