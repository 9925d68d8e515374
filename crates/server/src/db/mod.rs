//! Database operations for the Spoonit `PostgreSQL` store.
//!
//! The database is the single source of truth; everything the in-process
//! caches and the change feed hold is derived from it.
//!
//! ## Tables
//!
//! - `app_user` - Accounts, profiles, password hashes
//! - `password_reset_token` - One-shot, expiring reset tokens
//! - `tower_sessions.session` - Session storage (tower-sessions)
//! - `recipe` - Recipes (owner-scoped mutations)
//! - `favorite` - User/recipe favorite set (unique pairs)
//! - `category` - User-defined categories
//! - `shopping_list_item` - Deduplicated shopping list entries
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p spoonit-cli -- migrate
//! ```
//!
//! Queries use runtime-checked `sqlx::query_as`/`query` with `FromRow`
//! types so the workspace builds without a live database.

pub mod categories;
pub mod recipes;
pub mod shopping_list;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The row does not exist (or is not owned by the caller).
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored data failed domain validation on the way out.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into `Conflict`.
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
