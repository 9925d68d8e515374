//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use spoonit_core::{Email, UserId};

/// A Spoonit account (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Normalized email address, unique per account.
    pub email: Email,
    /// Display name shown in the app, if set.
    pub display_name: Option<String>,
    /// Profile photo URL, if set.
    pub photo_url: Option<String>,
    /// Free-form client preferences (theme, units, locale).
    pub preferences: serde_json::Value,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Derived per-user counters, computed from the recipe and favorite
/// tables rather than stored.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UserCounts {
    pub recipe_count: i64,
    pub favorite_count: i64,
}

/// The logged-in user as stored in the session.
///
/// Minimal on purpose; the full profile is always re-read from the
/// database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}
