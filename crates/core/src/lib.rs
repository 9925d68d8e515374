//! Spoonit Core - Shared domain types.
//!
//! This crate provides common types used across all Spoonit components:
//! - `server` - JSON API consumed by the mobile and web clients
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. Recipe filtering lives here because it is a pure
//! predicate over already-fetched data.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, emails, recipes, and categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
