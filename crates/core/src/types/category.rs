//! Category types.
//!
//! Categories are user-defined grouping labels. A compiled-in default set
//! is shown to anonymous and freshly registered users until they create
//! their own.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, UserId};

/// Icon key for a category, rendered by the clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoryIcon {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
    Drink,
    Baking,
    Soup,
    Salad,
    #[default]
    Other,
}

impl CategoryIcon {
    /// Stable string key used by clients and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Dessert => "dessert",
            Self::Snack => "snack",
            Self::Drink => "drink",
            Self::Baking => "baking",
            Self::Soup => "soup",
            Self::Salad => "salad",
            Self::Other => "other",
        }
    }

    /// Parse an icon key, falling back to [`Self::Other`] for unknown keys.
    ///
    /// Unknown keys come from older clients; they must not fail the request.
    #[must_use]
    pub fn parse_lossy(key: &str) -> Self {
        match key {
            "breakfast" => Self::Breakfast,
            "lunch" => Self::Lunch,
            "dinner" => Self::Dinner,
            "dessert" => Self::Dessert,
            "snack" => Self::Snack,
            "drink" => Self::Drink,
            "baking" => Self::Baking,
            "soup" => Self::Soup,
            "salad" => Self::Salad,
            _ => Self::Other,
        }
    }
}

/// A user-defined category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    /// Owning user.
    pub user_id: UserId,
    pub name: String,
    pub icon: CategoryIcon,
}

/// A built-in category shown before the user has any of their own.
///
/// Default categories have no database row and no owner; clients address
/// them by name.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DefaultCategory {
    pub name: &'static str,
    pub icon: CategoryIcon,
}

/// The default category set, in display order.
pub const DEFAULT_CATEGORIES: &[DefaultCategory] = &[
    DefaultCategory {
        name: "Breakfast",
        icon: CategoryIcon::Breakfast,
    },
    DefaultCategory {
        name: "Lunch",
        icon: CategoryIcon::Lunch,
    },
    DefaultCategory {
        name: "Dinner",
        icon: CategoryIcon::Dinner,
    },
    DefaultCategory {
        name: "Desserts",
        icon: CategoryIcon::Dessert,
    },
    DefaultCategory {
        name: "Snacks",
        icon: CategoryIcon::Snack,
    },
    DefaultCategory {
        name: "Drinks",
        icon: CategoryIcon::Drink,
    },
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_categories_have_unique_names() {
        let mut names: Vec<&str> = DEFAULT_CATEGORIES.iter().map(|c| c.name).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);
        assert!(before >= 4);
    }

    #[test]
    fn test_icon_key_roundtrip() {
        for icon in [
            CategoryIcon::Breakfast,
            CategoryIcon::Dessert,
            CategoryIcon::Soup,
            CategoryIcon::Other,
        ] {
            assert_eq!(CategoryIcon::parse_lossy(icon.as_str()), icon);
        }
    }

    #[test]
    fn test_unknown_icon_key_falls_back() {
        assert_eq!(CategoryIcon::parse_lossy("spaceship"), CategoryIcon::Other);
    }

    #[test]
    fn test_icon_serde_matches_key() {
        let json = serde_json::to_string(&CategoryIcon::Dessert).unwrap();
        assert_eq!(json, "\"dessert\"");
    }
}
