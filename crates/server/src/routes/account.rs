//! Account route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::recipes::RecipeRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result, clear_sentry_user};
use crate::middleware::RequireAuth;
use crate::models::user::{User, UserCounts};
use crate::state::AppState;

/// Profile plus counters derived from the recipe and favorite tables.
#[derive(Serialize)]
pub struct AccountResponse {
    #[serde(flatten)]
    pub user: User,
    #[serde(flatten)]
    pub counts: UserCounts,
}

/// Profile update. Doubly-optional fields distinguish "leave unchanged"
/// (absent) from "clear" (explicit null).
#[derive(Deserialize, Default)]
pub struct ProfilePatch {
    #[serde(default, deserialize_with = "double_option")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub photo_url: Option<Option<String>>,
    pub preferences: Option<serde_json::Value>,
}

fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Current profile with derived counters.
#[instrument(skip_all, fields(request_id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<AccountResponse>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;
    let counts = RecipeRepository::new(state.pool())
        .counts_for_user(current.id)
        .await?;

    Ok(Json(AccountResponse { user, counts }))
}

/// Apply a partial profile update.
#[instrument(skip_all, fields(request_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<User>> {
    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;

    let display_name = patch.display_name.unwrap_or(user.display_name);
    let photo_url = patch.photo_url.unwrap_or(user.photo_url);
    let preferences = patch.preferences.unwrap_or(user.preferences);

    let updated = users
        .save_profile(
            current.id,
            display_name.as_deref(),
            photo_url.as_deref(),
            &preferences,
        )
        .await?;

    Ok(Json(updated))
}

/// Delete the account and everything it owns, then end the session.
#[instrument(skip_all, fields(request_id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
) -> Result<StatusCode> {
    UserRepository::new(state.pool()).delete(current.id).await?;

    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("failed to destroy session: {e}")))?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}
