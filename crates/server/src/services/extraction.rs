//! Client for the recipe extraction API.
//!
//! The extraction backend turns a public recipe URL or a photo of a recipe
//! into structured fields. Its internals are opaque to us; this client owns
//! the wire format and maps every failure mode to a typed error so callers
//! never see a half-extracted recipe.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use spoonit_core::RecipeDraft;

use crate::config::ExtractionConfig;

/// Largest image payload we will send, in bytes.
const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Errors that can occur when calling the extraction API.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Image exceeds the upload limit.
    #[error("image too large: {size} bytes (max {MAX_IMAGE_BYTES})")]
    ImageTooLarge { size: usize },
}

/// What the extraction backend returns for a recipe.
///
/// Every field is optional; the backend fills what it can read. The
/// title falls back to "Imported recipe" so the draft always validates.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedRecipe {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub prep_minutes: Option<i32>,
    pub cook_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ExtractedRecipe {
    /// Convert the extraction payload into a recipe draft.
    #[must_use]
    pub fn into_draft(self, source_url: Option<String>) -> RecipeDraft {
        RecipeDraft {
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Imported recipe".to_owned()),
            description: self.description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            prep_minutes: self.prep_minutes,
            cook_minutes: self.cook_minutes,
            servings: self.servings,
            image_url: self.image_url,
            source_url,
            notes: None,
            tags: self.tags,
            category_id: None,
        }
    }
}

#[derive(Serialize)]
struct UrlRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    /// Base64-encoded image bytes.
    image: String,
    content_type: &'a str,
}

/// Recipe extraction API client.
#[derive(Clone)]
pub struct ExtractionClient {
    client: reqwest::Client,
    base_url: String,
}

impl ExtractionClient {
    /// Create a new extraction API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ExtractionError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Extract a recipe from a public URL.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the API rejects the URL, or
    /// the response doesn't parse.
    pub async fn extract_from_url(&self, url: &str) -> Result<ExtractedRecipe, ExtractionError> {
        let endpoint = format!("{}/extract_recipe_from_url", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .json(&UrlRequest { url })
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Extract a recipe from an image.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::ImageTooLarge` if the image exceeds the
    /// upload limit; otherwise errors as [`extract_from_url`](Self::extract_from_url).
    pub async fn extract_from_image(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<ExtractedRecipe, ExtractionError> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ExtractionError::ImageTooLarge { size: bytes.len() });
        }

        let endpoint = format!("{}/extract_recipe_from_image", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .json(&ImageRequest {
                image: BASE64.encode(bytes),
                content_type,
            })
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response(
        response: reqwest::Response,
    ) -> Result<ExtractedRecipe, ExtractionError> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ExtractionError::Parse(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_recipe_into_draft_defaults_title() {
        let extracted: ExtractedRecipe =
            serde_json::from_str(r#"{"title": "  ", "ingredients": ["water"]}"#).unwrap();
        let draft = extracted.into_draft(Some("https://example.com/soup".into()));

        assert_eq!(draft.title, "Imported recipe");
        assert_eq!(draft.ingredients, vec!["water"]);
        assert_eq!(draft.source_url.as_deref(), Some("https://example.com/soup"));
    }

    #[test]
    fn test_extracted_recipe_parses_sparse_payload() {
        let extracted: ExtractedRecipe = serde_json::from_str(r#"{"title": "Soup"}"#).unwrap();
        assert_eq!(extracted.title.as_deref(), Some("Soup"));
        assert!(extracted.ingredients.is_empty());
        assert!(extracted.instructions.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_image_is_rejected_before_sending() {
        let config = ExtractionConfig {
            base_url: "https://extract.invalid".into(),
            api_key: secrecy::SecretString::from("test-key"),
        };
        let client = ExtractionClient::new(&config).unwrap();

        let bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
        let err = client.extract_from_image(&bytes, "image/jpeg").await;
        assert!(matches!(
            err,
            Err(ExtractionError::ImageTooLarge { size }) if size == MAX_IMAGE_BYTES + 1
        ));
    }
}
