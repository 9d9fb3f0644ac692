//! Price computation entry points.
//!
//! Both calling conventions resolve their selections against the catalog,
//! build a modifier list, and hand it to the engine in `tradein-core`.
//! The computations are tolerant of stale client state: selection entries
//! that no longer resolve are skipped, and an unknown device yields the
//! defined sentinel price of zero rather than an error.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::SqlitePool;
use tradein_core::pricing::{self, Modifier};
use tradein_core::selection;
use tradein_core::types::DbId;

use crate::error::ServiceResult;
use tradein_db::repositories::{AttributeRepo, CriterionRepo, DeviceRepo};

/// Computes final prices from catalog data and client selections.
pub struct PricingService {
    pool: SqlitePool,
}

impl PricingService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Attribute-based estimate: `attribute_id → option_id` selections.
    ///
    /// Pairs whose attribute or option no longer exists are skipped.
    pub async fn price_with_attributes(
        &self,
        device_id: DbId,
        selected: &HashMap<String, Value>,
    ) -> ServiceResult<Decimal> {
        let Some(device) = DeviceRepo::find_by_id(&self.pool, device_id).await? else {
            return Ok(Decimal::ZERO);
        };

        let mut modifiers = Vec::new();
        for pair in selection::parse_attribute_selections(selected) {
            let Some(attribute) = AttributeRepo::find_by_id(&self.pool, pair.attribute_id).await?
            else {
                continue;
            };
            let Some(option) = AttributeRepo::option_by_id(&self.pool, pair.option_id).await?
            else {
                continue;
            };
            modifiers.push(Modifier {
                kind: attribute.discount_kind(),
                amount: option.discount_value(),
            });
        }

        Ok(pricing::apply_modifiers(device.base_price(), &modifiers))
    }

    /// Criteria-based estimate: `criterion_id → "yes"/"no"` answers.
    ///
    /// Only "yes" answers count, and only for active criteria whose brand
    /// list covers the device's brand; everything else is skipped.
    pub async fn price_with_criteria(
        &self,
        device_id: DbId,
        answers: &HashMap<String, Value>,
    ) -> ServiceResult<Decimal> {
        let Some(device) = DeviceRepo::find_by_id(&self.pool, device_id).await? else {
            return Ok(Decimal::ZERO);
        };

        let mut modifiers = Vec::new();
        for answer in selection::parse_criterion_answers(answers) {
            if !answer.answered_yes {
                continue;
            }
            let Some(criterion) = CriterionRepo::find_by_id(&self.pool, answer.criterion_id).await?
            else {
                continue;
            };
            if !criterion.active
                || !pricing::criterion_applies(&criterion.applicable_brands, &device.brand)
            {
                continue;
            }
            // Criterion discounts are always fixed amounts.
            modifiers.push(Modifier::fixed(criterion.discount_value()));
        }

        Ok(pricing::apply_modifiers(device.base_price(), &modifiers))
    }
}
