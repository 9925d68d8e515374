//! Recipe import route handlers.
//!
//! Both endpoints call the external extraction API, turn its payload into
//! a draft, and store the result as a normal recipe owned by the caller.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use spoonit_core::Recipe;

use crate::db::recipes::RecipeRepository;
use crate::error::{AppError, Result};
use crate::feed::RecipeEvent;
use crate::middleware::RequireAuth;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UrlImportBody {
    pub url: String,
}

/// Import a recipe from a public URL.
#[instrument(skip_all, fields(request_id))]
pub async fn from_url(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<UrlImportBody>,
) -> Result<(StatusCode, Json<Recipe>)> {
    let url = url::Url::parse(&body.url)
        .map_err(|_| AppError::BadRequest("invalid URL".to_owned()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::BadRequest("URL must be http or https".to_owned()));
    }

    let extracted = state.extraction().extract_from_url(url.as_str()).await?;

    store_extracted(&state, user.id, extracted, Some(url.to_string())).await
}

/// Import a recipe from an uploaded photo (multipart field `image`).
#[instrument(skip_all, fields(request_id))]
pub async fn from_image(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Recipe>)> {
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("image") {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("failed to read image: {e}")))?;
            image = Some((bytes.to_vec(), content_type));
            break;
        }
    }

    let (bytes, content_type) =
        image.ok_or_else(|| AppError::BadRequest("missing image field".to_owned()))?;

    let extracted = state
        .extraction()
        .extract_from_image(&bytes, &content_type)
        .await?;

    store_extracted(&state, user.id, extracted, None).await
}

async fn store_extracted(
    state: &AppState,
    user_id: spoonit_core::UserId,
    extracted: crate::services::extraction::ExtractedRecipe,
    source_url: Option<String>,
) -> Result<(StatusCode, Json<Recipe>)> {
    let draft = extracted
        .into_draft(source_url)
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let recipe = RecipeRepository::new(state.pool())
        .create(user_id, &draft)
        .await?;

    state
        .feed()
        .publish(user_id, RecipeEvent::Created { recipe_id: recipe.id })
        .await;

    Ok((StatusCode::CREATED, Json(recipe)))
}
