//! Core types for Spoonit.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod recipe;

pub use category::{Category, CategoryIcon, DEFAULT_CATEGORIES, DefaultCategory};
pub use email::{Email, EmailError};
pub use id::*;
pub use recipe::{Recipe, RecipeDraft, RecipeDraftError, RecipeFilter, RecipePatch, normalize_tag};
