//! Domain models for the Spoonit server.
//!
//! These types represent validated domain objects separate from database
//! row types. Recipe and category types live in `spoonit-core`; the types
//! here are server-only (accounts, sessions, shopping list).

pub mod shopping_list;
pub mod user;

pub use shopping_list::ShoppingListItem;
pub use user::{CurrentUser, User, UserCounts};

/// Session storage keys.
pub mod session_keys {
    /// The logged-in user, set at login and cleared at logout.
    pub const CURRENT_USER: &str = "current_user";
}
