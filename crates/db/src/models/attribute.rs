//! Attribute and attribute-option models.
//!
//! An attribute is a device-scoped question ("Screen condition?") with a
//! discount type; its options are the selectable answers, each carrying a
//! discount magnitude interpreted per the attribute's type.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use tradein_core::money;
use tradein_core::pricing::DiscountKind;
use tradein_core::types::{DbId, Timestamp};

/// A row from the `attributes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attribute {
    pub id: DbId,
    /// `None` for attributes imported without a device scope.
    pub device_id: Option<DbId>,
    pub name: String,
    /// Stored as text; the schema constrains it to the valid kinds.
    pub discount_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Attribute {
    pub fn discount_kind(&self) -> DiscountKind {
        DiscountKind::parse(&self.discount_type).unwrap_or(DiscountKind::Fixed)
    }
}

/// A row from the `attribute_options` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttributeOption {
    pub id: DbId,
    pub attribute_id: DbId,
    pub label: String,
    /// Magnitude in minor units; unit depends on the owning attribute's
    /// discount type.
    pub discount_value_minor: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AttributeOption {
    pub fn discount_value(&self) -> Decimal {
        money::from_minor_units(self.discount_value_minor)
    }
}

/// An attribute with its options populated, in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeWithOptions {
    #[serde(flatten)]
    pub attribute: Attribute,
    pub options: Vec<AttributeOption>,
}
