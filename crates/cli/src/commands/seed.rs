//! Database seeding commands.

use tracing::info;

use spoonit_core::UserId;
use spoonit_server::services::categories::CategoryService;

/// Create the default categories for an existing user.
///
/// Idempotent: categories the user already has are left alone.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn categories(user_id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let user_id = UserId::new(user_id);

    CategoryService::new(&pool).seed_defaults(user_id).await?;
    info!(%user_id, "Default categories seeded");

    Ok(())
}
