//! Repository for the `attributes` and `attribute_options` tables.

use sqlx::SqlitePool;
use tradein_core::pricing::DiscountKind;
use tradein_core::types::DbId;

use crate::models::attribute::{Attribute, AttributeOption, AttributeWithOptions};

const COLUMNS: &str = "id, device_id, name, discount_type, created_at, updated_at";

const OPTION_COLUMNS: &str = "id, attribute_id, label, discount_value_minor, created_at, updated_at";

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Provides CRUD operations for attributes and their options.
pub struct AttributeRepo;

impl AttributeRepo {
    /// Insert a new attribute, returning the created row.
    ///
    /// `device_id` is `None` for attributes created by the importer with
    /// no device scope.
    pub async fn create(
        pool: &SqlitePool,
        device_id: Option<DbId>,
        name: &str,
        discount_type: DiscountKind,
    ) -> Result<Attribute, sqlx::Error> {
        let query = format!(
            "INSERT INTO attributes (device_id, name, discount_type) \
             VALUES (?1, ?2, ?3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attribute>(&query)
            .bind(device_id)
            .bind(name)
            .bind(discount_type.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find an attribute by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Attribute>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attributes WHERE id = ?1");
        sqlx::query_as::<_, Attribute>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the oldest attribute with the given name (used by the
    /// interchange importer to resolve rows that carry no id).
    pub async fn find_by_name(
        pool: &SqlitePool,
        name: &str,
    ) -> Result<Option<Attribute>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attributes WHERE name = ?1 ORDER BY id ASC LIMIT 1"
        );
        sqlx::query_as::<_, Attribute>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List a device's attributes with their options populated.
    ///
    /// Attributes and options both come back in insertion order
    /// (ascending id).
    pub async fn list_for_device(
        pool: &SqlitePool,
        device_id: DbId,
    ) -> Result<Vec<AttributeWithOptions>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attributes WHERE device_id = ?1 ORDER BY id ASC");
        let attributes = sqlx::query_as::<_, Attribute>(&query)
            .bind(device_id)
            .fetch_all(pool)
            .await?;

        let mut populated = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            let options = Self::options_for_attribute(pool, attribute.id).await?;
            populated.push(AttributeWithOptions { attribute, options });
        }
        Ok(populated)
    }

    /// Update an attribute's name and/or discount type.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        name: Option<&str>,
        discount_type: Option<DiscountKind>,
    ) -> Result<Option<Attribute>, sqlx::Error> {
        let query = format!(
            "UPDATE attributes SET \
                name = COALESCE(?2, name), \
                discount_type = COALESCE(?3, discount_type), \
                updated_at = {NOW} \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attribute>(&query)
            .bind(id)
            .bind(name)
            .bind(discount_type.map(DiscountKind::as_str))
            .fetch_optional(pool)
            .await
    }

    /// Delete an attribute together with its options. Returns `true` if
    /// the attribute existed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM attribute_options WHERE attribute_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM attributes WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    // -- options ----------------------------------------------------------

    /// Insert a new option under an attribute, returning the created row.
    pub async fn create_option(
        pool: &SqlitePool,
        attribute_id: DbId,
        label: &str,
        discount_value_minor: i64,
    ) -> Result<AttributeOption, sqlx::Error> {
        let query = format!(
            "INSERT INTO attribute_options (attribute_id, label, discount_value_minor) \
             VALUES (?1, ?2, ?3) \
             RETURNING {OPTION_COLUMNS}"
        );
        sqlx::query_as::<_, AttributeOption>(&query)
            .bind(attribute_id)
            .bind(label)
            .bind(discount_value_minor)
            .fetch_one(pool)
            .await
    }

    /// Find an option by ID.
    pub async fn option_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<AttributeOption>, sqlx::Error> {
        let query = format!("SELECT {OPTION_COLUMNS} FROM attribute_options WHERE id = ?1");
        sqlx::query_as::<_, AttributeOption>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an attribute's options in insertion order.
    pub async fn options_for_attribute(
        pool: &SqlitePool,
        attribute_id: DbId,
    ) -> Result<Vec<AttributeOption>, sqlx::Error> {
        let query = format!(
            "SELECT {OPTION_COLUMNS} FROM attribute_options \
             WHERE attribute_id = ?1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, AttributeOption>(&query)
            .bind(attribute_id)
            .fetch_all(pool)
            .await
    }

    /// List every attribute in the catalog (export path), ascending id.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Attribute>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attributes ORDER BY id ASC");
        sqlx::query_as::<_, Attribute>(&query).fetch_all(pool).await
    }
}
