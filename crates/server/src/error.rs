//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::categories::CategoryError;
use crate::services::extraction::ExtractionError;
use crate::services::shopping_list::ShoppingListError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Extraction API operation failed.
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Category operation failed.
    #[error("Category error: {0}")]
    Category(#[from] CategoryError),

    /// Shopping list operation failed.
    #[error("Shopping list error: {0}")]
    ShoppingList(#[from] ShoppingListError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error should be captured to Sentry.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(e) => !matches!(e, RepositoryError::NotFound),
            Self::Auth(e) => matches!(e, AuthError::Repository(_) | AuthError::PasswordHash),
            Self::Extraction(e) => matches!(
                e,
                ExtractionError::Http(_) | ExtractionError::Parse(_) | ExtractionError::Api { .. }
            ),
            Self::Category(e) => matches!(e, CategoryError::Repository(_)),
            Self::ShoppingList(e) => matches!(e, ShoppingListError::Repository(_)),
            Self::Internal(_) => true,
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(e) => match e {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::RateLimited => StatusCode::LOCKED,
                AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidResetToken => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Extraction(err) => match err {
                ExtractionError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Category(err) => match err {
                CategoryError::InvalidName(_) => StatusCode::BAD_REQUEST,
                CategoryError::AlreadyExists => StatusCode::CONFLICT,
                CategoryError::NotFound => StatusCode::NOT_FOUND,
                CategoryError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::ShoppingList(err) => match err {
                ShoppingListError::InvalidItem(_) | ShoppingListError::ListFull => {
                    StatusCode::BAD_REQUEST
                }
                ShoppingListError::Duplicate => StatusCode::CONFLICT,
                ShoppingListError::NotFound => StatusCode::NOT_FOUND,
                ShoppingListError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message. Internal details never leak here.
    fn message(&self) -> String {
        match self {
            Self::Database(e) => match e {
                RepositoryError::NotFound => "Not found".to_string(),
                RepositoryError::Conflict(msg) => msg.clone(),
                _ => "Internal server error".to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    "Invalid credentials".to_string()
                }
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::RateLimited => {
                    "Too many failed attempts, please try again later".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::InvalidResetToken => "Invalid or expired reset link".to_string(),
                _ => "Authentication error".to_string(),
            },
            Self::Extraction(err) => match err {
                ExtractionError::ImageTooLarge { .. } => "Image is too large".to_string(),
                _ => "Recipe import failed, please try again".to_string(),
            },
            Self::Category(CategoryError::Repository(_))
            | Self::ShoppingList(ShoppingListError::Repository(_))
            | Self::Internal(_) => "Internal server error".to_string(),
            Self::Category(err) => err.to_string(),
            Self::ShoppingList(err) => err.to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let body = Json(json!({ "error": self.message() }));

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lockout_maps_to_423() {
        let err = AppError::Auth(AuthError::RateLimited);
        assert_eq!(err.status(), StatusCode::LOCKED);
    }

    #[test]
    fn test_duplicate_shopping_item_maps_to_409() {
        let err = AppError::ShoppingList(ShoppingListError::Duplicate);
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_owner_mismatch_surfaces_as_not_found() {
        // Owner-scoped queries report a non-owner's mutation as missing,
        // so the response never confirms the resource exists.
        let err = AppError::Database(RepositoryError::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Not found");
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_database_errors_hide_details() {
        let err = AppError::Database(RepositoryError::DataCorruption("bad email".into()));
        assert_eq!(err.message(), "Internal server error");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_invalid_credentials_are_generic() {
        assert_eq!(
            AppError::Auth(AuthError::UserNotFound).message(),
            "Invalid credentials"
        );
        assert_eq!(
            AppError::Auth(AuthError::InvalidCredentials).message(),
            "Invalid credentials"
        );
    }

    #[test]
    fn test_extraction_failures_map_to_502() {
        let err = AppError::Extraction(ExtractionError::Api {
            status: 500,
            message: "upstream".into(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.message(), "Recipe import failed, please try again");
    }
}
