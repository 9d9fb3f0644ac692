//! Evaluation criterion model: a brand-scoped yes/no condition carrying a
//! fixed discount. Criteria have no device relation; they are matched
//! against a device's brand at price-computation time.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use tradein_core::money;
use tradein_core::types::{DbId, Timestamp};

/// A row from the `criteria` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Criterion {
    pub id: DbId,
    pub text: String,
    /// Always a fixed currency amount, in minor units.
    pub discount_value_minor: i64,
    /// Comma-separated brand list, or the sentinel `All`.
    pub applicable_brands: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Criterion {
    pub fn discount_value(&self) -> Decimal {
        money::from_minor_units(self.discount_value_minor)
    }
}
