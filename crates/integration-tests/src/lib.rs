//! Integration tests for Spoonit.
//!
//! # Running Tests
//!
//! The tests need a disposable `PostgreSQL` database and are skipped when
//! `SPOONIT_TEST_DATABASE_URL` is not set:
//!
//! ```bash
//! export SPOONIT_TEST_DATABASE_URL=postgres://localhost/spoonit_test
//! cargo test -p spoonit-integration-tests
//! ```
//!
//! Migrations run automatically on first connect. Every test creates its
//! own throwaway user, so tests don't interfere with each other and the
//! database never needs resetting between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use sqlx::PgPool;
use uuid::Uuid;

use spoonit_core::{Email, RecipeDraft};
use spoonit_server::db::users::UserRepository;
use spoonit_server::models::user::User;

/// Shared setup for database-backed tests.
pub struct TestContext {
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the test database, or `None` if none is configured.
    ///
    /// # Panics
    ///
    /// Panics if the configured database is unreachable or migrations fail;
    /// a broken test database should fail loudly, not skip.
    pub async fn new() -> Option<Self> {
        let url = std::env::var("SPOONIT_TEST_DATABASE_URL").ok()?;

        let pool = PgPool::connect(&url)
            .await
            .expect("failed to connect to SPOONIT_TEST_DATABASE_URL");
        sqlx::migrate!("../server/migrations")
            .run(&pool)
            .await
            .expect("failed to run migrations");

        Some(Self { pool })
    }

    /// Create a throwaway user with a unique email.
    pub async fn create_user(&self) -> User {
        let email = Email::parse(&format!("user-{}@example.com", Uuid::new_v4())).unwrap();
        UserRepository::new(&self.pool)
            .create_with_password(&email, None, "$argon2id$test-placeholder-hash")
            .await
            .unwrap()
    }
}

/// A minimal valid draft for tests.
#[must_use]
pub fn draft(title: &str) -> RecipeDraft {
    RecipeDraft {
        title: title.to_owned(),
        ingredients: vec!["Water".to_owned(), "Salt".to_owned()],
        instructions: vec!["Combine.".to_owned()],
        ..RecipeDraft::default()
    }
}
