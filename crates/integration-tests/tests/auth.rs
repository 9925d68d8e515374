//! Database-backed authentication tests.
//!
//! Skipped unless `SPOONIT_TEST_DATABASE_URL` is set.

#![allow(clippy::unwrap_used)]

use uuid::Uuid;

use spoonit_integration_tests::TestContext;
use spoonit_server::services::auth::{AuthError, AuthService, LoginGate};

fn unique_email() -> String {
    format!("auth-{}@example.com", Uuid::new_v4())
}

#[tokio::test]
async fn test_register_then_login() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let gate = LoginGate::new();
    let auth = AuthService::new(&ctx.pool, &gate);
    let email = unique_email();

    let registered = auth
        .register(&email, Some("Cook"), "a strong password")
        .await
        .unwrap();
    assert_eq!(registered.display_name.as_deref(), Some("Cook"));

    let logged_in = auth.login(&email, "a strong password").await.unwrap();
    assert_eq!(logged_in.id, registered.id);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let gate = LoginGate::new();
    let auth = AuthService::new(&ctx.pool, &gate);
    let email = unique_email();

    auth.register(&email, None, "a strong password").await.unwrap();

    // Email normalization makes the uppercase form the same account.
    let err = auth
        .register(&email.to_uppercase(), None, "another password")
        .await;
    assert!(matches!(err, Err(AuthError::UserAlreadyExists)));
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let gate = LoginGate::new();
    let auth = AuthService::new(&ctx.pool, &gate);
    let email = unique_email();

    auth.register(&email, None, "a strong password").await.unwrap();

    let err = auth.login(&email, "not the password").await;
    assert!(matches!(err, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_lockout_after_repeated_failures() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let gate = LoginGate::new();
    let auth = AuthService::new(&ctx.pool, &gate);
    let email = unique_email();

    auth.register(&email, None, "a strong password").await.unwrap();

    for _ in 0..5 {
        let err = auth.login(&email, "wrong").await;
        assert!(matches!(err, Err(AuthError::InvalidCredentials)));
    }

    // Locked now, even with the correct password.
    let err = auth.login(&email, "a strong password").await;
    assert!(matches!(err, Err(AuthError::RateLimited)));

    // An explicit clear (successful reset flow) unlocks immediately.
    gate.clear(&email);
    auth.login(&email, "a strong password").await.unwrap();
}

#[tokio::test]
async fn test_unknown_emails_also_count_toward_lockout() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let gate = LoginGate::new();
    let auth = AuthService::new(&ctx.pool, &gate);
    let email = unique_email();

    for _ in 0..5 {
        let err = auth.login(&email, "guess").await;
        assert!(matches!(err, Err(AuthError::InvalidCredentials)));
    }

    let err = auth.login(&email, "guess").await;
    assert!(matches!(err, Err(AuthError::RateLimited)));
}

#[tokio::test]
async fn test_password_reset_flow() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let gate = LoginGate::new();
    let auth = AuthService::new(&ctx.pool, &gate);
    let email = unique_email();

    let user = auth.register(&email, None, "original password").await.unwrap();

    let token = auth
        .start_password_reset(&email)
        .await
        .unwrap()
        .expect("registered email should yield a token");

    // Only a digest of the token lands in the database.
    let (raw_stored,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM password_reset_token WHERE token = $1")
            .bind(&token)
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(raw_stored, 0);

    let reset_user = auth
        .complete_password_reset(&token, "replacement password")
        .await
        .unwrap();
    assert_eq!(reset_user, user.id);

    // Token is single-use.
    let err = auth.complete_password_reset(&token, "again").await;
    assert!(matches!(err, Err(AuthError::InvalidResetToken)));

    auth.login(&email, "replacement password").await.unwrap();
    let err = auth.login(&email, "original password").await;
    assert!(matches!(err, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_change_password() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let gate = LoginGate::new();
    let auth = AuthService::new(&ctx.pool, &gate);
    let email = unique_email();

    let user = auth.register(&email, None, "first password").await.unwrap();

    let err = auth
        .change_password(user.id, &user.email, "wrong current", "second password")
        .await;
    assert!(matches!(err, Err(AuthError::InvalidCredentials)));

    auth.change_password(user.id, &user.email, "first password", "second password")
        .await
        .unwrap();

    auth.login(&email, "second password").await.unwrap();
}
