//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use spoonit_core::{Category, CategoryIcon, CategoryId};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::categories::CategoryService;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCategoryBody {
    pub name: String,
    #[serde(default)]
    pub icon: Option<CategoryIcon>,
}

/// The caller's categories.
#[instrument(skip_all, fields(request_id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Category>>> {
    let categories = CategoryService::new(state.pool()).list(user.id).await?;
    Ok(Json(categories))
}

/// Create a category.
#[instrument(skip_all, fields(request_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateCategoryBody>,
) -> Result<(StatusCode, Json<Category>)> {
    let icon = body.icon.unwrap_or(CategoryIcon::Other);
    let category = CategoryService::new(state.pool())
        .create(user.id, &body.name, icon)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Delete a category. Its recipes become uncategorized.
#[instrument(skip_all, fields(request_id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    CategoryService::new(state.pool()).delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
