//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::models::user::User;
use crate::services::auth::AuthService;
use crate::services::categories::CategoryService;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordBody {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct ResetRequestBody {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetConfirmBody {
    pub token: String,
    pub new_password: String,
}

/// Create an account, seed its default categories, and log it in.
#[instrument(skip_all, fields(request_id))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<User>)> {
    let auth = AuthService::new(state.pool(), state.login_gate());
    let user = auth
        .register(&body.email, body.display_name.as_deref(), &body.password)
        .await?;

    CategoryService::new(state.pool()).seed_defaults(user.id).await?;

    start_session(&session, &user).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login with email and password.
#[instrument(skip_all, fields(request_id))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<User>> {
    let auth = AuthService::new(state.pool(), state.login_gate());
    let user = auth.login(&body.email, &body.password).await?;

    start_session(&session, &user).await?;

    Ok(Json(user))
}

/// Destroy the current session.
#[instrument(skip_all, fields(request_id))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("failed to destroy session: {e}")))?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// Change the logged-in user's password.
#[instrument(skip_all, fields(request_id))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<ChangePasswordBody>,
) -> Result<StatusCode> {
    let auth = AuthService::new(state.pool(), state.login_gate());
    auth.change_password(user.id, &user.email, &body.current_password, &body.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Request a password reset token.
///
/// Responds identically whether or not the email is registered, so the
/// endpoint never reveals which emails have accounts. Token delivery
/// happens out of band.
#[instrument(skip_all, fields(request_id))]
pub async fn request_reset(
    State(state): State<AppState>,
    Json(body): Json<ResetRequestBody>,
) -> Result<(StatusCode, Json<Value>)> {
    let auth = AuthService::new(state.pool(), state.login_gate());

    if let Some(token) = auth.start_password_reset(&body.email).await? {
        // Handed to the mail worker; never returned to the caller.
        tracing::debug!(token, "password reset token issued");
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "status": "If that email exists, a reset link is on its way" })),
    ))
}

/// Complete a password reset with a token.
#[instrument(skip_all, fields(request_id))]
pub async fn confirm_reset(
    State(state): State<AppState>,
    Json(body): Json<ResetConfirmBody>,
) -> Result<StatusCode> {
    let auth = AuthService::new(state.pool(), state.login_gate());
    auth.complete_password_reset(&body.token, &body.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser::from(user);
    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to set session: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}
