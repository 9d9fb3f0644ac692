//! Validated admin mutations over the catalog.
//!
//! Every write validates its input first and never leaves a partial
//! change behind. Writes that can alter device-search results flush the
//! search cache; criteria edits do not touch it, since criteria lookups
//! are never cached.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::SqlitePool;
use tradein_core::error::CoreError;
use tradein_core::money;
use tradein_core::pricing::DiscountKind;
use tradein_core::types::DbId;
use validator::{Validate, ValidationError};

use crate::cache::SearchCache;
use crate::error::{validation_error, ServiceError, ServiceResult};
use tradein_db::models::attribute::{Attribute, AttributeOption};
use tradein_db::models::criterion::Criterion;
use tradein_db::models::device::Device;
use tradein_db::repositories::{AttributeRepo, CriterionRepo, DeviceRepo};

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDeviceRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    pub base_price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDeviceRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub base_price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAttributeRequest {
    pub device_id: DbId,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub discount_type: DiscountKind,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAttributeRequest {
    pub name: Option<String>,
    pub discount_type: Option<DiscountKind>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOptionRequest {
    pub attribute_id: DbId,
    #[serde(default)]
    pub label: String,
    pub discount_value: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCriterionRequest {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    pub discount_value: Decimal,
    #[validate(custom(function = "not_blank"))]
    pub applicable_brands: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCriterionRequest {
    pub text: Option<String>,
    pub discount_value: Option<Decimal>,
    pub applicable_brands: Option<String>,
    pub active: Option<bool>,
}

fn default_active() -> bool {
    true
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Admin mutation operations, with required-field validation before any
/// write and coarse cache invalidation after device-affecting ones.
pub struct CatalogService {
    pool: SqlitePool,
    cache: Arc<SearchCache>,
}

impl CatalogService {
    pub fn new(pool: SqlitePool, cache: Arc<SearchCache>) -> Self {
        Self { pool, cache }
    }

    // -- devices ----------------------------------------------------------

    pub async fn create_device(&self, req: &CreateDeviceRequest) -> ServiceResult<Device> {
        req.validate().map_err(validation_error)?;
        let cents = amount_to_minor(req.base_price, "base_price")?;
        let device =
            DeviceRepo::create(&self.pool, req.name.trim(), req.brand.trim(), cents).await?;
        self.cache.flush_all();
        Ok(device)
    }

    pub async fn update_device(&self, id: DbId, req: &UpdateDeviceRequest) -> ServiceResult<Device> {
        if let Some(name) = req.name.as_deref() {
            not_blank(name)
                .map_err(|_| CoreError::Validation("device name must not be blank".into()))?;
        }
        let cents = match req.base_price {
            Some(amount) => Some(amount_to_minor(amount, "base_price")?),
            None => None,
        };
        let device = DeviceRepo::update(
            &self.pool,
            id,
            req.name.as_deref().map(str::trim),
            req.brand.as_deref().map(str::trim),
            cents,
        )
        .await?
        .ok_or(CoreError::NotFound {
            entity: "device",
            id,
        })?;
        self.cache.flush_all();
        Ok(device)
    }

    pub async fn delete_device(&self, id: DbId) -> ServiceResult<()> {
        if !DeviceRepo::delete(&self.pool, id).await? {
            return Err(CoreError::NotFound {
                entity: "device",
                id,
            }
            .into());
        }
        self.cache.flush_all();
        Ok(())
    }

    // -- attributes -------------------------------------------------------

    pub async fn create_attribute(&self, req: &CreateAttributeRequest) -> ServiceResult<Attribute> {
        req.validate().map_err(validation_error)?;
        if DeviceRepo::find_by_id(&self.pool, req.device_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "device",
                id: req.device_id,
            }
            .into());
        }
        let attribute = AttributeRepo::create(
            &self.pool,
            Some(req.device_id),
            req.name.trim(),
            req.discount_type,
        )
        .await?;
        Ok(attribute)
    }

    pub async fn update_attribute(
        &self,
        id: DbId,
        req: &UpdateAttributeRequest,
    ) -> ServiceResult<Attribute> {
        if let Some(name) = req.name.as_deref() {
            not_blank(name)
                .map_err(|_| CoreError::Validation("attribute name must not be blank".into()))?;
        }
        let attribute = AttributeRepo::update(
            &self.pool,
            id,
            req.name.as_deref().map(str::trim),
            req.discount_type,
        )
        .await?
        .ok_or(CoreError::NotFound {
            entity: "attribute",
            id,
        })?;
        Ok(attribute)
    }

    pub async fn delete_attribute(&self, id: DbId) -> ServiceResult<()> {
        if !AttributeRepo::delete(&self.pool, id).await? {
            return Err(CoreError::NotFound {
                entity: "attribute",
                id,
            }
            .into());
        }
        Ok(())
    }

    pub async fn create_option(&self, req: &CreateOptionRequest) -> ServiceResult<AttributeOption> {
        if AttributeRepo::find_by_id(&self.pool, req.attribute_id)
            .await?
            .is_none()
        {
            return Err(CoreError::NotFound {
                entity: "attribute",
                id: req.attribute_id,
            }
            .into());
        }
        let minor = amount_to_minor(req.discount_value, "discount_value")?;
        let option =
            AttributeRepo::create_option(&self.pool, req.attribute_id, req.label.trim(), minor)
                .await?;
        Ok(option)
    }

    // -- criteria ---------------------------------------------------------

    pub async fn create_criterion(&self, req: &CreateCriterionRequest) -> ServiceResult<Criterion> {
        req.validate().map_err(validation_error)?;
        let minor = amount_to_minor(req.discount_value, "discount_value")?;
        let criterion = CriterionRepo::create(
            &self.pool,
            req.text.trim(),
            minor,
            req.applicable_brands.trim(),
            req.active,
        )
        .await?;
        Ok(criterion)
    }

    pub async fn update_criterion(
        &self,
        id: DbId,
        req: &UpdateCriterionRequest,
    ) -> ServiceResult<Criterion> {
        if let Some(text) = req.text.as_deref() {
            not_blank(text)
                .map_err(|_| CoreError::Validation("criterion text must not be blank".into()))?;
        }
        if let Some(brands) = req.applicable_brands.as_deref() {
            not_blank(brands)
                .map_err(|_| CoreError::Validation("brand list must not be blank".into()))?;
        }
        let minor = match req.discount_value {
            Some(amount) => Some(amount_to_minor(amount, "discount_value")?),
            None => None,
        };
        let criterion = CriterionRepo::update(
            &self.pool,
            id,
            req.text.as_deref().map(str::trim),
            minor,
            req.applicable_brands.as_deref().map(str::trim),
            req.active,
        )
        .await?
        .ok_or(CoreError::NotFound {
            entity: "criterion",
            id,
        })?;
        Ok(criterion)
    }

    pub async fn delete_criterion(&self, id: DbId) -> ServiceResult<()> {
        if !CriterionRepo::delete(&self.pool, id).await? {
            return Err(CoreError::NotFound {
                entity: "criterion",
                id,
            }
            .into());
        }
        Ok(())
    }

    // -- maintenance ------------------------------------------------------

    /// Wipe all catalog data and drop every cached search result.
    pub async fn clear_catalog(&self) -> ServiceResult<()> {
        tradein_db::clear_catalog(&self.pool).await?;
        self.cache.flush_all();
        tracing::info!("Catalog cleared");
        Ok(())
    }
}

/// Convert a boundary decimal amount into stored minor units, rejecting
/// negatives and out-of-range magnitudes.
fn amount_to_minor(amount: Decimal, field: &str) -> ServiceResult<i64> {
    if amount.is_sign_negative() {
        return Err(ServiceError::from(CoreError::Validation(format!(
            "{field} must not be negative"
        ))));
    }
    money::to_minor_units(amount).ok_or_else(|| {
        ServiceError::from(CoreError::Validation(format!("{field} is out of range")))
    })
}
