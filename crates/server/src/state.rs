//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::feed::RecipeFeed;
use crate::services::auth::LoginGate;
use crate::services::extraction::{ExtractionClient, ExtractionError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    extraction: ExtractionClient,
    login_gate: LoginGate,
    feed: RecipeFeed,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the extraction HTTP client fails to build.
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, ExtractionError> {
        let extraction = ExtractionClient::new(&config.extraction)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                extraction,
                login_gate: LoginGate::new(),
                feed: RecipeFeed::new(),
            }),
        })
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the extraction API client.
    #[must_use]
    pub fn extraction(&self) -> &ExtractionClient {
        &self.inner.extraction
    }

    /// Get a reference to the login lockout gate.
    #[must_use]
    pub fn login_gate(&self) -> &LoginGate {
        &self.inner.login_gate
    }

    /// Get a reference to the recipe change feed.
    #[must_use]
    pub fn feed(&self) -> &RecipeFeed {
        &self.inner.feed
    }
}
