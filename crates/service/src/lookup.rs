//! Read side of the estimator: device search, attribute listings, and
//! criteria listings, shaped for the presentation layer.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::SqlitePool;
use tradein_core::pricing::DiscountKind;
use tradein_core::search;
use tradein_core::types::DbId;

use crate::cache::SearchCache;
use crate::error::ServiceResult;
use tradein_db::models::device::Device;
use tradein_db::repositories::{AttributeRepo, CriterionRepo, DeviceRepo};

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// One device-search result. `name` and `brand` are HTML-escaped at cache
/// fill time, so consumers render them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceHit {
    pub id: DbId,
    pub name: String,
    pub brand: String,
}

impl DeviceHit {
    fn sanitized(device: &Device) -> Self {
        Self {
            id: device.id,
            name: search::escape_html(&device.name),
            brand: search::escape_html(&device.brand),
        }
    }
}

/// One selectable answer to an attribute.
#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub id: DbId,
    pub label: String,
    pub discount_value: Decimal,
}

/// An attribute with its options, ready for the estimator form.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeView {
    pub id: DbId,
    pub name: String,
    pub discount_type: DiscountKind,
    pub options: Vec<OptionView>,
}

/// A yes/no criterion shown for a brand; answers default to "no".
#[derive(Debug, Clone, Serialize)]
pub struct CriterionView {
    pub id: DbId,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Catalog reads with a TTL cache in front of device search.
pub struct LookupService {
    pool: SqlitePool,
    cache: Arc<SearchCache>,
    search_timeout: Duration,
}

impl LookupService {
    pub fn new(pool: SqlitePool, cache: Arc<SearchCache>, search_timeout: Duration) -> Self {
        Self {
            pool,
            cache,
            search_timeout,
        }
    }

    /// Search devices by name substring.
    ///
    /// Results are cached by the exact trimmed term. This path degrades
    /// instead of failing: a storage error or a read slower than the
    /// configured timeout yields an empty result set.
    pub async fn search_devices(&self, term: &str) -> Vec<DeviceHit> {
        let term = search::normalize_term(term);
        if let Some(hits) = self.cache.get(term) {
            return hits;
        }

        let devices =
            match tokio::time::timeout(self.search_timeout, DeviceRepo::list(&self.pool, Some(term)))
                .await
            {
                Ok(Ok(devices)) => devices,
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, term, "Device search failed");
                    return Vec::new();
                }
                Err(_) => {
                    tracing::warn!(term, "Device search timed out");
                    return Vec::new();
                }
            };

        let hits: Vec<DeviceHit> = devices.iter().map(DeviceHit::sanitized).collect();
        self.cache.insert(term, hits.clone());
        hits
    }

    /// List a device's attributes with their options, in insertion order.
    pub async fn attributes_for_device(&self, device_id: DbId) -> ServiceResult<Vec<AttributeView>> {
        let attributes = AttributeRepo::list_for_device(&self.pool, device_id).await?;
        Ok(attributes
            .into_iter()
            .map(|entry| AttributeView {
                id: entry.attribute.id,
                name: entry.attribute.name.clone(),
                discount_type: entry.attribute.discount_kind(),
                options: entry
                    .options
                    .into_iter()
                    .map(|option| OptionView {
                        id: option.id,
                        label: option.label.clone(),
                        discount_value: option.discount_value(),
                    })
                    .collect(),
            })
            .collect())
    }

    /// List active criteria applicable to a brand, ascending id.
    ///
    /// Not cached: criteria edits must show up immediately.
    pub async fn criteria_for_brand(&self, brand: &str) -> ServiceResult<Vec<CriterionView>> {
        let criteria = CriterionRepo::list_for_brand(&self.pool, brand).await?;
        Ok(criteria
            .into_iter()
            .map(|criterion| CriterionView {
                id: criterion.id,
                text: criterion.text,
            })
            .collect())
    }
}
