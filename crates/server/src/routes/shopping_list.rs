//! Shopping list route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use spoonit_core::ShoppingItemId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::ShoppingListItem;
use crate::services::shopping_list::ShoppingListService;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddItemBody {
    pub text: String,
}

#[derive(Serialize)]
pub struct ClearResponse {
    pub removed: u64,
}

/// The caller's shopping list, oldest entry first.
#[instrument(skip_all, fields(request_id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<ShoppingListItem>>> {
    let items = ShoppingListService::new(state.pool()).list(user.id).await?;
    Ok(Json(items))
}

/// Add an item. Duplicates and a full list are rejected.
#[instrument(skip_all, fields(request_id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddItemBody>,
) -> Result<(StatusCode, Json<ShoppingListItem>)> {
    let item = ShoppingListService::new(state.pool())
        .add(user.id, &body.text)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Remove one item.
#[instrument(skip_all, fields(request_id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ShoppingItemId>,
) -> Result<StatusCode> {
    ShoppingListService::new(state.pool()).remove(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Empty the list.
#[instrument(skip_all, fields(request_id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ClearResponse>> {
    let removed = ShoppingListService::new(state.pool()).clear(user.id).await?;
    Ok(Json(ClearResponse { removed }))
}
