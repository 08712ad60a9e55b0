//! Database layer for contrib-pulse
//!
//! Raw activity tables are written by the ingest layer and only read here;
//! derived tables (users, tags, summaries, stats) are written by the
//! pipeline. All queries use the runtime sqlx API so the crate builds
//! without a live database.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

pub mod activity;
pub mod comments;
pub mod issues;
pub mod prs;
pub mod reviews;
pub mod stats;
pub mod summaries;
pub mod tags;
pub mod users;

/// Create a database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    info!("Database connected");
    Ok(pool)
}

/// Run database migrations from SQL files
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Running migrations...");

    let migration_sql = include_str!("../../../migrations/001_initial.sql");
    sqlx::raw_sql(migration_sql).execute(pool).await?;

    info!("Migrations complete");
    Ok(())
}
