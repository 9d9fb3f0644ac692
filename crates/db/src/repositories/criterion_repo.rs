//! Repository for the `criteria` table.

use sqlx::SqlitePool;
use tradein_core::search;
use tradein_core::types::DbId;

use crate::models::criterion::Criterion;

const COLUMNS: &str =
    "id, text, discount_value_minor, applicable_brands, active, created_at, updated_at";

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Provides CRUD operations for evaluation criteria.
pub struct CriterionRepo;

impl CriterionRepo {
    /// Insert a new criterion, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        text: &str,
        discount_value_minor: i64,
        applicable_brands: &str,
        active: bool,
    ) -> Result<Criterion, sqlx::Error> {
        let query = format!(
            "INSERT INTO criteria (text, discount_value_minor, applicable_brands, active) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Criterion>(&query)
            .bind(text)
            .bind(discount_value_minor)
            .bind(applicable_brands)
            .bind(active)
            .fetch_one(pool)
            .await
    }

    /// Find a criterion by ID.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<Criterion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM criteria WHERE id = ?1");
        sqlx::query_as::<_, Criterion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every criterion, active or not (admin and export path).
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Criterion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM criteria ORDER BY id ASC");
        sqlx::query_as::<_, Criterion>(&query).fetch_all(pool).await
    }

    /// List active criteria applicable to a brand, ascending id.
    ///
    /// A criterion applies when its brand list is the `All` sentinel or
    /// contains the brand. An empty brand only matches the sentinel.
    pub async fn list_for_brand(
        pool: &SqlitePool,
        brand: &str,
    ) -> Result<Vec<Criterion>, sqlx::Error> {
        let needle = search::escape_like(brand.trim());
        let query = format!(
            "SELECT {COLUMNS} FROM criteria \
             WHERE active = 1 \
               AND ( \
                   UPPER(TRIM(applicable_brands)) = 'ALL' \
                   OR (?1 <> '' AND applicable_brands LIKE '%' || ?1 || '%' ESCAPE '\\') \
               ) \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Criterion>(&query)
            .bind(needle)
            .fetch_all(pool)
            .await
    }

    /// Update a criterion. Only non-`None` fields are applied.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        text: Option<&str>,
        discount_value_minor: Option<i64>,
        applicable_brands: Option<&str>,
        active: Option<bool>,
    ) -> Result<Option<Criterion>, sqlx::Error> {
        let query = format!(
            "UPDATE criteria SET \
                text = COALESCE(?2, text), \
                discount_value_minor = COALESCE(?3, discount_value_minor), \
                applicable_brands = COALESCE(?4, applicable_brands), \
                active = COALESCE(?5, active), \
                updated_at = {NOW} \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Criterion>(&query)
            .bind(id)
            .bind(text)
            .bind(discount_value_minor)
            .bind(applicable_brands)
            .bind(active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a criterion by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM criteria WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
