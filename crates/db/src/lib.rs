//! Catalog store: sqlx models and repositories over SQLite.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from a database URL, creating the database
/// file when it does not exist yet.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Apply all pending migrations.
pub async fn migrate(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Verify the store answers queries.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Wipe all catalog data (devices, attributes, options, criteria) in one
/// transaction. Table structure is left intact.
pub async fn clear_catalog(pool: &DbPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM attribute_options")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM attributes")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM devices").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM criteria").execute(&mut *tx).await?;
    tx.commit().await
}
