//! Device model: a priceable catalog item with a base price and brand.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use tradein_core::money;
use tradein_core::types::{DbId, Timestamp};

/// A row from the `devices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Device {
    pub id: DbId,
    pub name: String,
    pub brand: String,
    /// Base price in integer minor units (two implied decimal places).
    pub base_price_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Device {
    /// Base price as a decimal amount.
    pub fn base_price(&self) -> Decimal {
        money::from_minor_units(self.base_price_cents)
    }
}
