//! Repository for the `devices` table.

use sqlx::SqlitePool;
use tradein_core::search;
use tradein_core::types::DbId;

use crate::models::device::Device;

const COLUMNS: &str = "id, name, brand, base_price_cents, created_at, updated_at";

/// RFC3339 UTC timestamp expression used to touch `updated_at`.
const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Provides CRUD operations for devices, including the cascading delete
/// over attributes and their options.
pub struct DeviceRepo;

impl DeviceRepo {
    /// Insert a new device, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        name: &str,
        brand: &str,
        base_price_cents: i64,
    ) -> Result<Device, sqlx::Error> {
        let query = format!(
            "INSERT INTO devices (name, brand, base_price_cents) \
             VALUES (?1, ?2, ?3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(name)
            .bind(brand)
            .bind(base_price_cents)
            .fetch_one(pool)
            .await
    }

    /// Find a device by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices WHERE id = ?1");
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List devices ordered by name.
    ///
    /// An empty or absent search term returns the whole catalog; a
    /// non-empty term performs a case-insensitive substring match on the
    /// device name.
    pub async fn list(
        pool: &SqlitePool,
        search_term: Option<&str>,
    ) -> Result<Vec<Device>, sqlx::Error> {
        let term = search_term.map(search::normalize_term).unwrap_or("");
        if term.is_empty() {
            let query = format!("SELECT {COLUMNS} FROM devices ORDER BY name ASC");
            sqlx::query_as::<_, Device>(&query).fetch_all(pool).await
        } else {
            let query = format!(
                "SELECT {COLUMNS} FROM devices \
                 WHERE name LIKE '%' || ?1 || '%' ESCAPE '\\' \
                 ORDER BY name ASC"
            );
            sqlx::query_as::<_, Device>(&query)
                .bind(search::escape_like(term))
                .fetch_all(pool)
                .await
        }
    }

    /// Update a device. Only non-`None` fields are applied.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        name: Option<&str>,
        brand: Option<&str>,
        base_price_cents: Option<i64>,
    ) -> Result<Option<Device>, sqlx::Error> {
        let query = format!(
            "UPDATE devices SET \
                name = COALESCE(?2, name), \
                brand = COALESCE(?3, brand), \
                base_price_cents = COALESCE(?4, base_price_cents), \
                updated_at = {NOW} \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .bind(name)
            .bind(brand)
            .bind(base_price_cents)
            .fetch_optional(pool)
            .await
    }

    /// Delete a device together with its attributes and their options.
    ///
    /// Runs in a single transaction so a partial cascade never leaves
    /// orphaned child rows. Returns `true` if the device existed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM attribute_options WHERE attribute_id IN \
                 (SELECT id FROM attributes WHERE device_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM attributes WHERE device_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM devices WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
