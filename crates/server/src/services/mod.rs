//! Business logic services.
//!
//! Services own the repositories they need and translate repository
//! errors into domain errors the route layer can map to responses.

pub mod auth;
pub mod categories;
pub mod extraction;
pub mod shopping_list;
