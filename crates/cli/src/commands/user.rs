//! User account management commands.

use tracing::info;

use spoonit_server::services::auth::{AuthService, LoginGate};
use spoonit_server::services::categories::CategoryService;

/// Create a user account with its default categories.
///
/// # Errors
///
/// Returns an error if the email or password is invalid, the email is
/// taken, or the database is unreachable.
pub async fn create(
    email: &str,
    display_name: Option<&str>,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let gate = LoginGate::new();
    let auth = AuthService::new(&pool, &gate);
    let user = auth.register(email, display_name, password).await?;

    CategoryService::new(&pool).seed_defaults(user.id).await?;

    info!(user_id = %user.id, email = %user.email, "User created");

    Ok(())
}
