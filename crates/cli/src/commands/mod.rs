//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;

/// Connect to the database named by `SPOONIT_DATABASE_URL` (or the
/// conventional `DATABASE_URL` fallback).
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SPOONIT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "SPOONIT_DATABASE_URL not set")?;

    Ok(spoonit_server::db::create_pool(&database_url).await?)
}
