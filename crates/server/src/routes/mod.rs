//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness check
//! GET    /health/ready            - Readiness check (database ping)
//!
//! # Auth
//! POST   /auth/register           - Create an account
//! POST   /auth/login              - Login
//! POST   /auth/logout             - Logout
//! POST   /auth/password           - Change password (requires auth)
//! POST   /auth/reset              - Request a password reset token
//! POST   /auth/reset/confirm      - Complete a password reset
//!
//! # Account (requires auth)
//! GET    /account                 - Profile with derived counters
//! PATCH  /account                 - Update profile
//! DELETE /account                 - Delete account and all data
//!
//! # Recipes
//! GET    /recipes                 - Own recipes (?category_id= / ?tag=)
//! POST   /recipes                 - Create recipe
//! GET    /recipes/favorites       - Favorite recipes
//! GET    /recipes/watch           - SSE change feed
//! GET    /recipes/{id}            - One recipe (public, shareable)
//! PATCH  /recipes/{id}            - Partial update
//! DELETE /recipes/{id}            - Delete recipe
//! POST   /recipes/{id}/favorite   - Toggle favorite
//!
//! # Import (requires auth)
//! POST   /import/url              - Extract a recipe from a URL
//! POST   /import/image            - Extract a recipe from a photo
//!
//! # Categories (requires auth)
//! GET    /categories              - List categories
//! POST   /categories              - Create category
//! DELETE /categories/{id}         - Delete category
//!
//! # Shopping list (requires auth)
//! GET    /shopping-list           - List items
//! POST   /shopping-list           - Add item
//! DELETE /shopping-list           - Clear list
//! DELETE /shopping-list/{id}      - Remove item
//! ```

pub mod account;
pub mod auth;
pub mod categories;
pub mod health;
pub mod import;
pub mod recipes;
pub mod shopping_list;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/password", post(auth::change_password))
        .route("/reset", post(auth::request_reset))
        .route("/reset/confirm", post(auth::confirm_reset))
}

/// Create the recipe routes router.
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::index).post(recipes::create))
        .route("/favorites", get(recipes::favorites))
        .route("/watch", get(recipes::watch))
        .route(
            "/{id}",
            get(recipes::show)
                .patch(recipes::update)
                .delete(recipes::destroy),
        )
        .route("/{id}/favorite", post(recipes::toggle_favorite))
}

/// Create the import routes router.
pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/url", post(import::from_url))
        .route("/image", post(import::from_image))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/{id}", delete(categories::destroy))
}

/// Create the shopping list routes router.
pub fn shopping_list_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(shopping_list::index)
                .post(shopping_list::add)
                .delete(shopping_list::clear),
        )
        .route("/{id}", delete(shopping_list::remove))
}

/// Create all routes for the API.
///
/// Auth endpoints carry the strict per-IP limiter on top of the
/// per-identifier login gate inside `AuthService`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route(
            "/account",
            get(account::show)
                .patch(account::update)
                .delete(account::destroy),
        )
        .nest(
            "/auth",
            auth_routes().layer(crate::middleware::auth_rate_limiter()),
        )
        .nest("/recipes", recipe_routes())
        .nest("/import", import_routes())
        .nest("/categories", category_routes())
        .nest("/shopping-list", shopping_list_routes())
}
