//! PostgreSQL persistence for the fundra engine.
//!
//! Row structs and request DTOs live under [`models`]; query code lives
//! under [`repositories`]. Connection management and schema migrations
//! are handled here at the crate root.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

/// Shared connection pool handle.
pub type DbPool = sqlx::PgPool;

/// Create a connection pool against the given database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("applying database migrations");
    sqlx::migrate!("../../db/migrations").run(pool).await
}
