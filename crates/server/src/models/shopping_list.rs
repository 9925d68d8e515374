//! Shopping list domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use spoonit_core::{ShoppingItemId, UserId};

/// An entry on a user's shopping list.
///
/// At most one item per (user, normalized text) pair exists; the dedup key
/// is computed in `services::shopping_list` before insert and enforced by a
/// unique index.
#[derive(Debug, Clone, Serialize)]
pub struct ShoppingListItem {
    pub id: ShoppingItemId,
    pub user_id: UserId,
    /// The text as the user entered it (trimmed).
    pub text: String,
    pub created_at: DateTime<Utc>,
}
