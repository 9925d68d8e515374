//! Recipe route handlers.

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};
use tracing::instrument;

use spoonit_core::{CategoryId, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipePatch, UserId};

use crate::db::categories::CategoryRepository;
use crate::db::recipes::RecipeRepository;
use crate::error::{AppError, Result};
use crate::feed::RecipeEvent;
use crate::middleware::RequireAuth;
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub category_id: Option<CategoryId>,
    pub tag: Option<String>,
}

impl ListQuery {
    fn filter(&self) -> Option<RecipeFilter> {
        if let Some(id) = self.category_id {
            return Some(RecipeFilter::Category(id));
        }
        self.tag.clone().map(RecipeFilter::Tag)
    }
}

#[derive(Serialize)]
pub struct FavoriteResponse {
    pub recipe_id: RecipeId,
    pub favorite: bool,
}

/// The caller's recipes, newest first, optionally filtered by category or
/// tag. Served from the per-user cache when fresh.
#[instrument(skip_all, fields(request_id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Recipe>>> {
    let recipes = match state.feed().cached_list(user.id).await {
        Some(cached) => cached,
        None => {
            let fresh = RecipeRepository::new(state.pool())
                .list_for_user(user.id)
                .await?;
            state.feed().store_list(user.id, fresh).await
        }
    };

    let recipes = recipes.as_ref().clone();
    Ok(Json(match query.filter() {
        Some(filter) => filter.apply(recipes),
        None => recipes,
    }))
}

/// A recipe may only be filed under one of its owner's categories.
async fn ensure_category_owned(
    state: &AppState,
    user_id: UserId,
    category_id: CategoryId,
) -> Result<()> {
    let category = CategoryRepository::new(state.pool())
        .get_for_user(user_id, category_id)
        .await?;
    if category.is_none() {
        return Err(AppError::BadRequest("unknown category".to_owned()));
    }
    Ok(())
}

/// Create a recipe from a draft.
#[instrument(skip_all, fields(request_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(draft): Json<RecipeDraft>,
) -> Result<(StatusCode, Json<Recipe>)> {
    let draft = draft
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if let Some(category_id) = draft.category_id {
        ensure_category_owned(&state, user.id, category_id).await?;
    }

    let recipe = RecipeRepository::new(state.pool())
        .create(user.id, &draft)
        .await?;

    state
        .feed()
        .publish(user.id, RecipeEvent::Created { recipe_id: recipe.id })
        .await;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// One recipe by ID. Not owner-scoped; recipes are shareable by link.
#[instrument(skip_all, fields(request_id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<Json<Recipe>> {
    let recipe = RecipeRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("recipe not found".to_owned()))?;

    Ok(Json(recipe))
}

/// Apply a partial update to an owned recipe.
#[instrument(skip_all, fields(request_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
    Json(patch): Json<RecipePatch>,
) -> Result<Json<Recipe>> {
    if let Some(Some(category_id)) = patch.category_id {
        ensure_category_owned(&state, user.id, category_id).await?;
    }

    let recipe = RecipeRepository::new(state.pool())
        .update(user.id, id, patch)
        .await?;

    state
        .feed()
        .publish(user.id, RecipeEvent::Updated { recipe_id: id })
        .await;

    Ok(Json(recipe))
}

/// Delete an owned recipe.
#[instrument(skip_all, fields(request_id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode> {
    RecipeRepository::new(state.pool()).delete(user.id, id).await?;

    state
        .feed()
        .publish(user.id, RecipeEvent::Deleted { recipe_id: id })
        .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Toggle a recipe in the caller's favorite set. Returns the new state.
#[instrument(skip_all, fields(request_id))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<Json<FavoriteResponse>> {
    let favorite = RecipeRepository::new(state.pool())
        .toggle_favorite(user.id, id)
        .await?;

    let event = if favorite {
        RecipeEvent::Favorited { recipe_id: id }
    } else {
        RecipeEvent::Unfavorited { recipe_id: id }
    };
    state.feed().publish(user.id, event).await;

    Ok(Json(FavoriteResponse {
        recipe_id: id,
        favorite,
    }))
}

/// The caller's favorite recipes, most recently favorited first.
#[instrument(skip_all, fields(request_id))]
pub async fn favorites(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Recipe>>> {
    let recipes = RecipeRepository::new(state.pool())
        .list_favorites(user.id)
        .await?;

    Ok(Json(recipes))
}

/// SSE stream of the caller's recipe changes.
///
/// Subscribers that lag behind the broadcast buffer miss events silently;
/// clients are expected to refetch the list when the stream reconnects.
#[instrument(skip_all, fields(request_id))]
pub async fn watch(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let user_id = user.id;
    let stream = BroadcastStream::new(state.feed().subscribe()).filter_map(move |msg| {
        let msg = msg.ok()?;
        if msg.user_id != user_id {
            return None;
        }
        let data: Value = serde_json::to_value(&msg.event)
            .unwrap_or_else(|_| json!({ "type": "unknown" }));
        Some(Ok(Event::default().event("recipe").data(data.to_string())))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
