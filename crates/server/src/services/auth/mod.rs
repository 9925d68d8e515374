//! Authentication service.
//!
//! Email/password registration and login with a per-identifier lockout
//! gate, plus the password change/reset flows.

mod error;
mod lockout;

pub use error::AuthError;
pub use lockout::LoginGate;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use spoonit_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// How long a password reset token stays valid.
const RESET_TOKEN_TTL_HOURS: i64 = 2;

/// Authentication service.
///
/// Handles registration, login (behind the [`LoginGate`]), password
/// changes, and the reset-token flow.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    gate: &'a LoginGate,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, gate: &'a LoginGate) -> Self {
        Self {
            users: UserRepository::new(pool),
            gate,
        }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        display_name: Option<&str>,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let display_name = display_name.map(str::trim).filter(|n| !n.is_empty());

        let user = self
            .users
            .create_with_password(&email, display_name, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// Every failure (unknown email included) counts against the gate, so
    /// the lockout behaves identically whether or not the account exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::RateLimited` if the identifier is locked out.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        if !self.gate.can_attempt(email.as_str()) {
            return Err(AuthError::RateLimited);
        }

        let result = self.verify_login(&email, password).await;

        match &result {
            Ok(_) => self.gate.clear(email.as_str()),
            Err(AuthError::InvalidCredentials) => self.gate.record_failure(email.as_str()),
            Err(_) => {}
        }

        result
    }

    async fn verify_login(&self, email: &Email, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_password_hash(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Change a logged-in user's password, verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the current password is wrong.
    /// Returns `AuthError::WeakPassword` if the new password doesn't meet requirements.
    pub async fn change_password(
        &self,
        user_id: UserId,
        email: &Email,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let (_, password_hash) = self
            .users
            .get_password_hash(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        verify_password(current_password, &password_hash)?;

        validate_password(new_password)?;
        let new_hash = hash_password(new_password)?;
        self.users.update_password(user_id, &new_hash).await?;

        Ok(())
    }

    // =========================================================================
    // Password reset
    // =========================================================================

    /// Begin a password reset for an email address.
    ///
    /// Returns the token to deliver out of band, or `None` if no account
    /// matches. Callers respond identically either way so the endpoint
    /// doesn't reveal which emails are registered.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    pub async fn start_password_reset(&self, email: &str) -> Result<Option<String>, AuthError> {
        let email = Email::parse(email)?;

        let Some(user) = self.users.get_by_email(&email).await? else {
            return Ok(None);
        };

        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        self.users
            .create_reset_token(user.id, &hash_reset_token(&token), expires_at)
            .await?;

        Ok(Some(token))
    }

    /// Complete a password reset with a previously issued token.
    ///
    /// The token is single-use: it is consumed whether or not the new
    /// password validates, matching how the reset email is one-shot.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidResetToken` if the token is unknown or expired.
    /// Returns `AuthError::WeakPassword` if the new password doesn't meet requirements.
    pub async fn complete_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<UserId, AuthError> {
        let user_id = self
            .users
            .consume_reset_token(&hash_reset_token(token))
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        validate_password(new_password)?;
        let new_hash = hash_password(new_password)?;
        self.users.update_password(user_id, &new_hash).await?;

        // A completed reset also unlocks the account.
        if let Some(user) = self.users.get_by_id(user_id).await? {
            self.gate.clear(user.email.as_str());
        }

        Ok(user_id)
    }
}

// =============================================================================
// Password helpers
// =============================================================================

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// 32 random bytes, URL-safe base64.
fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 digest stored in place of the raw token; a leaked table yields
/// no usable reset links.
fn hash_reset_token(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_rejects_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_reset_tokens_are_unique_and_url_safe() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_stored_reset_token_is_a_digest() {
        let token = generate_reset_token();
        let digest = hash_reset_token(&token);
        assert_ne!(digest, token);
        assert_eq!(digest, hash_reset_token(&token));
    }
}
