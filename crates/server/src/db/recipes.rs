//! Recipe repository for database operations.
//!
//! Mutations are owner-scoped: updates and deletes match on both recipe id
//! and user id, so a non-owner sees `NotFound` rather than learning the
//! recipe exists. Favorite toggling runs in a transaction against the
//! `favorite` join table, which carries a unique (user, recipe) constraint.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use spoonit_core::{CategoryId, Recipe, RecipeDraft, RecipeId, RecipePatch, UserId};

use super::RepositoryError;
use crate::models::user::UserCounts;

/// Raw `recipe` row; converted to the domain [`Recipe`] on the way out.
#[derive(sqlx::FromRow)]
struct RecipeRow {
    id: i32,
    user_id: i32,
    title: String,
    description: Option<String>,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    prep_minutes: Option<i32>,
    cook_minutes: Option<i32>,
    servings: Option<i32>,
    image_url: Option<String>,
    source_url: Option<String>,
    notes: Option<String>,
    tags: Vec<String>,
    category_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: RecipeId::new(row.id),
            user_id: UserId::new(row.user_id),
            title: row.title,
            description: row.description,
            ingredients: row.ingredients,
            instructions: row.instructions,
            prep_minutes: row.prep_minutes,
            cook_minutes: row.cook_minutes,
            servings: row.servings,
            image_url: row.image_url,
            source_url: row.source_url,
            notes: row.notes,
            tags: row.tags,
            category_id: row.category_id.map(CategoryId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const RECIPE_COLUMNS: &str = "id, user_id, title, description, ingredients, instructions, \
     prep_minutes, cook_minutes, servings, image_url, source_url, notes, tags, category_id, \
     created_at, updated_at";

// Same list qualified for joins where favorite columns would collide.
const RECIPE_COLUMNS_PREFIXED: &str =
    "r.id, r.user_id, r.title, r.description, r.ingredients, r.instructions, \
     r.prep_minutes, r.cook_minutes, r.servings, r.image_url, r.source_url, r.notes, r.tags, \
     r.category_id, r.created_at, r.updated_at";

/// Repository for recipe database operations.
pub struct RecipeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RecipeRepository<'a> {
    /// Create a new recipe repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a recipe by ID.
    ///
    /// Reads are not owner-scoped; recipes are shareable by link.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let row: Option<RecipeRow> =
            sqlx::query_as(&format!("SELECT {RECIPE_COLUMNS} FROM recipe WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Recipe::from))
    }

    /// All recipes owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Recipe>, RepositoryError> {
        let rows: Vec<RecipeRow> = sqlx::query_as(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipe
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    /// Create a recipe from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the draft references a
    /// category that doesn't exist (FK violation surfaces as `Database`).
    pub async fn create(
        &self,
        user_id: UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RepositoryError> {
        let row: RecipeRow = sqlx::query_as(&format!(
            "INSERT INTO recipe (user_id, title, description, ingredients, instructions,
                                 prep_minutes, cook_minutes, servings, image_url, source_url,
                                 notes, tags, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&draft.title)
        .bind(draft.description.as_deref())
        .bind(&draft.ingredients)
        .bind(&draft.instructions)
        .bind(draft.prep_minutes)
        .bind(draft.cook_minutes)
        .bind(draft.servings)
        .bind(draft.image_url.as_deref())
        .bind(draft.source_url.as_deref())
        .bind(draft.notes.as_deref())
        .bind(&draft.tags)
        .bind(draft.category_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply a partial update to an owned recipe.
    ///
    /// The row is locked, patched in memory with the same logic the
    /// clients use, and written back whole. Last write wins across
    /// concurrent patches.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the recipe doesn't exist or
    /// isn't owned by `user_id`.
    pub async fn update(
        &self,
        user_id: UserId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<Recipe, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<RecipeRow> = sqlx::query_as(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipe WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let current: Recipe = row.ok_or(RepositoryError::NotFound)?.into();
        let updated = patch.apply(current);

        let row: RecipeRow = sqlx::query_as(&format!(
            "UPDATE recipe
             SET title = $1, description = $2, ingredients = $3, instructions = $4,
                 prep_minutes = $5, cook_minutes = $6, servings = $7, image_url = $8,
                 source_url = $9, notes = $10, tags = $11, category_id = $12,
                 updated_at = now()
             WHERE id = $13
             RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(&updated.title)
        .bind(updated.description.as_deref())
        .bind(&updated.ingredients)
        .bind(&updated.instructions)
        .bind(updated.prep_minutes)
        .bind(updated.cook_minutes)
        .bind(updated.servings)
        .bind(updated.image_url.as_deref())
        .bind(updated.source_url.as_deref())
        .bind(updated.notes.as_deref())
        .bind(&updated.tags)
        .bind(updated.category_id)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Delete an owned recipe. Irreversible; favorites cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the recipe doesn't exist or
    /// isn't owned by `user_id`.
    pub async fn delete(&self, user_id: UserId, id: RecipeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM recipe WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Toggle a recipe in the user's favorite set.
    ///
    /// Returns the new state: `true` if the recipe is now a favorite.
    /// Toggling twice always restores the original state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the recipe doesn't exist.
    pub async fn toggle_favorite(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(i32,)> = sqlx::query_as("SELECT id FROM recipe WHERE id = $1")
            .bind(recipe_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        // Insert-first with a conflict guard: a concurrent toggle that
        // wins the insert leaves this one on the delete branch instead of
        // tripping the primary key.
        let inserted = sqlx::query(
            "INSERT INTO favorite (user_id, recipe_id) VALUES ($1, $2)
             ON CONFLICT (user_id, recipe_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?;

        let favorite = if inserted.rows_affected() == 0 {
            sqlx::query("DELETE FROM favorite WHERE user_id = $1 AND recipe_id = $2")
                .bind(user_id)
                .bind(recipe_id)
                .execute(&mut *tx)
                .await?;
            false
        } else {
            true
        };

        tx.commit().await?;

        Ok(favorite)
    }

    /// Whether a recipe is in the user's favorite set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_favorite(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RepositoryError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM favorite WHERE user_id = $1 AND recipe_id = $2")
                .bind(user_id)
                .bind(recipe_id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.is_some())
    }

    /// The user's favorite recipes, most recently favorited first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_favorites(&self, user_id: UserId) -> Result<Vec<Recipe>, RepositoryError> {
        let rows: Vec<RecipeRow> = sqlx::query_as(&format!(
            "SELECT {RECIPE_COLUMNS_PREFIXED} FROM recipe r
             JOIN favorite f ON f.recipe_id = r.id
             WHERE f.user_id = $1
             ORDER BY f.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    /// Derived recipe/favorite counters for a user profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts_for_user(&self, user_id: UserId) -> Result<UserCounts, RepositoryError> {
        let (recipe_count, favorite_count): (i64, i64) = sqlx::query_as(
            "SELECT
                 (SELECT count(*) FROM recipe WHERE user_id = $1),
                 (SELECT count(*) FROM favorite WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(UserCounts {
            recipe_count,
            favorite_count,
        })
    }
}
