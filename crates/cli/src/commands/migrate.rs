//! Database migration command.
//!
//! Runs the server crate's embedded migrations. The server never migrates
//! on startup; deploys run this first.

use tracing::info;

/// Run pending database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;
    info!("Migrations complete");

    Ok(())
}
