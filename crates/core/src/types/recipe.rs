//! Recipe domain types and filtering.
//!
//! A recipe belongs to exactly one user. Drafts are validated before they
//! reach the repository; patches carry only the fields being changed.
//! Category/tag filtering is a pure predicate over an already-fetched list,
//! so it lives here rather than in the database layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, RecipeId, UserId};

/// A stored recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    /// Unique recipe ID.
    pub id: RecipeId,
    /// Owning user. Only the owner may edit or delete the recipe.
    pub user_id: UserId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered ingredient lines.
    pub ingredients: Vec<String>,
    /// Ordered instruction steps.
    pub instructions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Where the recipe was imported from, if anywhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Normalized (lowercased, deduplicated) tags.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Total time in minutes, if either component is known.
    #[must_use]
    pub fn total_minutes(&self) -> Option<i32> {
        match (self.prep_minutes, self.cook_minutes) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0).saturating_add(cook.unwrap_or(0))),
        }
    }

    /// Whether the recipe carries the given tag (case-insensitive).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = normalize_tag(tag);
        self.tags.iter().any(|t| *t == wanted)
    }
}

/// Errors from validating a [`RecipeDraft`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeDraftError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("servings must be positive")]
    InvalidServings,
    #[error("time values must not be negative")]
    NegativeTime,
}

/// Fields for creating a new recipe.
///
/// Produced by the manual-entry form, the URL importer, or the image
/// scanner; all three paths validate the same way.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub prep_minutes: Option<i32>,
    #[serde(default)]
    pub cook_minutes: Option<i32>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl RecipeDraft {
    /// Maximum title length.
    pub const MAX_TITLE_LENGTH: usize = 200;

    /// Validate and normalize the draft in place.
    ///
    /// Trims the title, drops blank ingredient/instruction lines, and
    /// normalizes tags.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeDraftError`] if the title is missing or over-long,
    /// servings is non-positive, or a time value is negative.
    pub fn validate(mut self) -> Result<Self, RecipeDraftError> {
        self.title = self.title.trim().to_owned();
        if self.title.is_empty() {
            return Err(RecipeDraftError::EmptyTitle);
        }
        if self.title.len() > Self::MAX_TITLE_LENGTH {
            return Err(RecipeDraftError::TitleTooLong {
                max: Self::MAX_TITLE_LENGTH,
            });
        }
        if self.servings.is_some_and(|s| s <= 0) {
            return Err(RecipeDraftError::InvalidServings);
        }
        if self.prep_minutes.is_some_and(|m| m < 0) || self.cook_minutes.is_some_and(|m| m < 0) {
            return Err(RecipeDraftError::NegativeTime);
        }

        self.ingredients.retain(|line| !line.trim().is_empty());
        self.instructions.retain(|step| !step.trim().is_empty());
        self.tags = normalize_tags(&self.tags);

        Ok(self)
    }
}

/// A partial update to a recipe.
///
/// `None` means "leave unchanged". Clearing an optional field is expressed
/// with `Some(None)` on the doubly-optional fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub instructions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub prep_minutes: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cook_minutes: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub servings: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub source_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<CategoryId>>,
}

/// Distinguish an absent field (leave unchanged) from an explicit `null`
/// (clear the field) when deserializing a patch.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl RecipePatch {
    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
            && self.prep_minutes.is_none()
            && self.cook_minutes.is_none()
            && self.servings.is_none()
            && self.image_url.is_none()
            && self.source_url.is_none()
            && self.notes.is_none()
            && self.tags.is_none()
            && self.category_id.is_none()
    }

    /// Apply the patch to a recipe, returning the updated value.
    ///
    /// Tags are normalized; the title is trimmed but an empty patched title
    /// is ignored rather than wiping the existing one.
    #[must_use]
    pub fn apply(self, mut recipe: Recipe) -> Recipe {
        if let Some(title) = self.title {
            let title = title.trim().to_owned();
            if !title.is_empty() {
                recipe.title = title;
            }
        }
        if let Some(description) = self.description {
            recipe.description = description;
        }
        if let Some(ingredients) = self.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(instructions) = self.instructions {
            recipe.instructions = instructions;
        }
        if let Some(prep) = self.prep_minutes {
            recipe.prep_minutes = prep;
        }
        if let Some(cook) = self.cook_minutes {
            recipe.cook_minutes = cook;
        }
        if let Some(servings) = self.servings {
            recipe.servings = servings;
        }
        if let Some(image_url) = self.image_url {
            recipe.image_url = image_url;
        }
        if let Some(source_url) = self.source_url {
            recipe.source_url = source_url;
        }
        if let Some(notes) = self.notes {
            recipe.notes = notes;
        }
        if let Some(tags) = self.tags {
            recipe.tags = normalize_tags(&tags);
        }
        if let Some(category_id) = self.category_id {
            recipe.category_id = category_id;
        }
        recipe
    }
}

/// A client-side filter over a fetched recipe list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeFilter {
    /// Recipes assigned to this category.
    Category(CategoryId),
    /// Recipes carrying this tag, case-insensitive (legacy tag filtering).
    Tag(String),
}

impl RecipeFilter {
    /// Whether a recipe matches this filter.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Self::Category(id) => recipe.category_id == Some(*id),
            Self::Tag(tag) => recipe.has_tag(tag),
        }
    }

    /// Retain only matching recipes, preserving order.
    #[must_use]
    pub fn apply(&self, recipes: Vec<Recipe>) -> Vec<Recipe> {
        recipes.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Normalize a single tag: trim and lowercase.
#[must_use]
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Normalize a tag list: trim, lowercase, drop empties, dedup preserving
/// first-seen order.
#[must_use]
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = normalize_tag(tag);
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn recipe(category: Option<CategoryId>, tags: &[&str]) -> Recipe {
        let now = Utc::now();
        Recipe {
            id: RecipeId::new(1),
            user_id: UserId::new(1),
            title: "Soup".to_owned(),
            description: None,
            ingredients: vec!["Water".to_owned(), "Salt".to_owned()],
            instructions: vec!["Boil".to_owned()],
            prep_minutes: Some(5),
            cook_minutes: Some(20),
            servings: Some(2),
            image_url: None,
            source_url: None,
            notes: None,
            tags: normalize_tags(&tags.iter().map(|t| (*t).to_owned()).collect::<Vec<_>>()),
            category_id: category,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_total_minutes() {
        assert_eq!(recipe(None, &[]).total_minutes(), Some(25));

        let mut r = recipe(None, &[]);
        r.cook_minutes = None;
        assert_eq!(r.total_minutes(), Some(5));
        r.prep_minutes = None;
        assert_eq!(r.total_minutes(), None);
    }

    #[test]
    fn test_category_filter_only_matches_assigned() {
        let filter = RecipeFilter::Category(CategoryId::new(2));
        assert!(filter.matches(&recipe(Some(CategoryId::new(2)), &[])));
        assert!(!filter.matches(&recipe(Some(CategoryId::new(3)), &[])));
        assert!(!filter.matches(&recipe(None, &[])));
    }

    #[test]
    fn test_tag_filter_is_case_insensitive() {
        let filter = RecipeFilter::Tag("Vegan".to_owned());
        assert!(filter.matches(&recipe(None, &["vegan", "quick"])));
        assert!(filter.matches(&recipe(None, &["VEGAN"])));
        assert!(!filter.matches(&recipe(None, &["vegetarian"])));
    }

    #[test]
    fn test_filter_apply_preserves_order() {
        let keep1 = recipe(Some(CategoryId::new(1)), &[]);
        let skip = recipe(Some(CategoryId::new(9)), &[]);
        let mut keep2 = recipe(Some(CategoryId::new(1)), &[]);
        keep2.id = RecipeId::new(2);

        let filter = RecipeFilter::Category(CategoryId::new(1));
        let out = filter.apply(vec![keep1.clone(), skip, keep2.clone()]);
        assert_eq!(out, vec![keep1, keep2]);
    }

    #[test]
    fn test_normalize_tags_dedups_and_drops_empties() {
        let tags: Vec<String> = ["Quick", " quick ", "", "Vegan"]
            .iter()
            .map(|t| (*t).to_owned())
            .collect();
        assert_eq!(normalize_tags(&tags), vec!["quick", "vegan"]);
    }

    #[test]
    fn test_draft_validate_trims_and_rejects_empty_title() {
        let draft = RecipeDraft {
            title: "  Soup  ".to_owned(),
            ..RecipeDraft::default()
        };
        assert_eq!(draft.validate().unwrap().title, "Soup");

        let blank = RecipeDraft {
            title: "   ".to_owned(),
            ..RecipeDraft::default()
        };
        assert_eq!(blank.validate(), Err(RecipeDraftError::EmptyTitle));
    }

    #[test]
    fn test_draft_validate_rejects_bad_numbers() {
        let draft = RecipeDraft {
            title: "Soup".to_owned(),
            servings: Some(0),
            ..RecipeDraft::default()
        };
        assert_eq!(draft.validate(), Err(RecipeDraftError::InvalidServings));

        let draft = RecipeDraft {
            title: "Soup".to_owned(),
            prep_minutes: Some(-5),
            ..RecipeDraft::default()
        };
        assert_eq!(draft.validate(), Err(RecipeDraftError::NegativeTime));
    }

    #[test]
    fn test_draft_validate_drops_blank_lines() {
        let draft = RecipeDraft {
            title: "Soup".to_owned(),
            ingredients: vec!["Water".to_owned(), "  ".to_owned()],
            instructions: vec![String::new(), "Boil".to_owned()],
            ..RecipeDraft::default()
        };
        let draft = draft.validate().unwrap();
        assert_eq!(draft.ingredients, vec!["Water"]);
        assert_eq!(draft.instructions, vec!["Boil"]);
    }

    #[test]
    fn test_patch_apply_partial_update() {
        let original = recipe(Some(CategoryId::new(1)), &["quick"]);
        let patch = RecipePatch {
            title: Some("Better Soup".to_owned()),
            category_id: Some(None),
            ..RecipePatch::default()
        };
        let updated = patch.apply(original.clone());
        assert_eq!(updated.title, "Better Soup");
        assert_eq!(updated.category_id, None);
        assert_eq!(updated.ingredients, original.ingredients);
    }

    #[test]
    fn test_patch_empty_title_is_ignored() {
        let original = recipe(None, &[]);
        let patch = RecipePatch {
            title: Some("   ".to_owned()),
            ..RecipePatch::default()
        };
        assert_eq!(patch.apply(original.clone()).title, original.title);
    }

    #[test]
    fn test_patch_json_null_clears_absent_leaves() {
        let patch: RecipePatch =
            serde_json::from_str(r#"{"title": "New", "notes": null}"#).unwrap();
        assert_eq!(patch.title, Some("New".to_owned()));
        assert_eq!(patch.notes, Some(None));

        let absent: RecipePatch = serde_json::from_str("{}").unwrap();
        assert!(absent.notes.is_none());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(RecipePatch::default().is_empty());
        let patch = RecipePatch {
            notes: Some(Some("x".to_owned())),
            ..RecipePatch::default()
        };
        assert!(!patch.is_empty());
    }
}
