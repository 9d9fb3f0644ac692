//! Row model for the tabular catalog interchange format.
//!
//! Every data row carries a type discriminator in its first column; the
//! remaining eight columns are interpreted positionally according to that
//! type. This module is the pure half of the adapter: parsing a field
//! slice into a typed row and rendering catalog entries back into field
//! arrays. Reading/writing actual CSV bytes happens in `tradein-service`.

use rust_decimal::Decimal;

use crate::money;
use crate::pricing::DiscountKind;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Fixed column count of the interchange format.
pub const COLUMN_COUNT: usize = 9;

/// Header row: the union of all per-type column interpretations.
/// Criterion rows reuse columns 5–8 as text / value / brands / active.
pub const EXPORT_HEADER: [&str; COLUMN_COUNT] = [
    "type",
    "device_name",
    "brand",
    "base_price",
    "attribute_name",
    "discount_type",
    "option_label",
    "discount_value",
    "attribute_id",
];

pub const TYPE_DEVICE: &str = "Device";
pub const TYPE_ATTRIBUTE: &str = "Attribute";
pub const TYPE_ATTRIBUTE_OPTION: &str = "Attribute Option";
pub const TYPE_CRITERION: &str = "Evaluation Criterion";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A successfully parsed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRow {
    Device {
        name: String,
        brand: String,
        base_price: Decimal,
    },
    AttributeOption {
        attribute_name: String,
        discount_type: DiscountKind,
        option_label: String,
        discount_value: Decimal,
        /// Explicit attribute id, when the row carries one. Resolution
        /// against the catalog happens in the import service.
        attribute_id: Option<DbId>,
    },
    Criterion {
        text: String,
        discount_value: Decimal,
        applicable_brands: String,
        active: bool,
    },
}

/// Why a row was skipped instead of parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSkip {
    /// Discriminator we do not import (bare `Attribute` rows included).
    UnhandledType(String),
    /// A field the row type cannot do without was empty.
    MissingField(&'static str),
}

impl std::fmt::Display for RowSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnhandledType(t) => write!(f, "unhandled row type {t:?}"),
            Self::MissingField(field) => write!(f, "missing required field {field}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse one data row (header excluded) into a typed [`CatalogRow`].
pub fn parse_row(fields: &[&str]) -> Result<CatalogRow, RowSkip> {
    match col(fields, 0) {
        TYPE_DEVICE => parse_device(fields),
        TYPE_ATTRIBUTE_OPTION => parse_attribute_option(fields),
        TYPE_CRITERION => parse_criterion(fields),
        other => Err(RowSkip::UnhandledType(other.to_string())),
    }
}

fn parse_device(fields: &[&str]) -> Result<CatalogRow, RowSkip> {
    let name = col(fields, 1);
    if name.is_empty() {
        return Err(RowSkip::MissingField("device_name"));
    }
    Ok(CatalogRow::Device {
        name: name.to_string(),
        brand: col(fields, 2).to_string(),
        base_price: money::parse_amount(col(fields, 3)),
    })
}

fn parse_attribute_option(fields: &[&str]) -> Result<CatalogRow, RowSkip> {
    let attribute_name = col(fields, 4);
    let attribute_id = parse_positive_id(col(fields, 8));
    if attribute_name.is_empty() && attribute_id.is_none() {
        return Err(RowSkip::MissingField("attribute_name"));
    }
    Ok(CatalogRow::AttributeOption {
        attribute_name: attribute_name.to_string(),
        discount_type: DiscountKind::parse(col(fields, 5)).unwrap_or(DiscountKind::Fixed),
        option_label: col(fields, 6).to_string(),
        discount_value: money::parse_amount(col(fields, 7)),
        attribute_id,
    })
}

fn parse_criterion(fields: &[&str]) -> Result<CatalogRow, RowSkip> {
    let text = col(fields, 4);
    if text.is_empty() {
        return Err(RowSkip::MissingField("criteria_text"));
    }
    let applicable_brands = col(fields, 6);
    if applicable_brands.is_empty() {
        return Err(RowSkip::MissingField("applicable_brands"));
    }
    Ok(CatalogRow::Criterion {
        text: text.to_string(),
        discount_value: money::parse_amount(col(fields, 5)),
        applicable_brands: applicable_brands.to_string(),
        active: parse_active(col(fields, 7)),
    })
}

/// Field access tolerant of short rows: missing columns read as empty.
fn col<'a>(fields: &'a [&str], index: usize) -> &'a str {
    fields.get(index).map(|f| f.trim()).unwrap_or("")
}

fn parse_positive_id(raw: &str) -> Option<DbId> {
    raw.parse::<DbId>().ok().filter(|id| *id > 0)
}

/// Blank means active; exported rows carry `1`/`0`.
fn parse_active(raw: &str) -> bool {
    raw.is_empty() || raw == "1" || raw.eq_ignore_ascii_case("true")
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn device_row(name: &str, brand: &str, base_price: Decimal) -> [String; COLUMN_COUNT] {
    let mut row = empty_row(TYPE_DEVICE);
    row[1] = name.to_string();
    row[2] = brand.to_string();
    row[3] = base_price.to_string();
    row
}

pub fn attribute_option_row(
    attribute_name: &str,
    discount_type: DiscountKind,
    option_label: &str,
    discount_value: Decimal,
    attribute_id: DbId,
) -> [String; COLUMN_COUNT] {
    let mut row = empty_row(TYPE_ATTRIBUTE_OPTION);
    row[4] = attribute_name.to_string();
    row[5] = discount_type.to_string();
    row[6] = option_label.to_string();
    row[7] = discount_value.to_string();
    row[8] = attribute_id.to_string();
    row
}

/// Row for an attribute that has no options yet, so the attribute itself
/// still survives an export/import cycle by name.
pub fn bare_attribute_row(
    attribute_name: &str,
    discount_type: DiscountKind,
    attribute_id: DbId,
) -> [String; COLUMN_COUNT] {
    let mut row = empty_row(TYPE_ATTRIBUTE);
    row[4] = attribute_name.to_string();
    row[5] = discount_type.to_string();
    row[8] = attribute_id.to_string();
    row
}

pub fn criterion_row(
    text: &str,
    discount_value: Decimal,
    applicable_brands: &str,
    active: bool,
) -> [String; COLUMN_COUNT] {
    let mut row = empty_row(TYPE_CRITERION);
    row[4] = text.to_string();
    row[5] = discount_value.to_string();
    row[6] = applicable_brands.to_string();
    row[7] = if active { "1" } else { "0" }.to_string();
    row
}

fn empty_row(row_type: &str) -> [String; COLUMN_COUNT] {
    let mut row: [String; COLUMN_COUNT] = Default::default();
    row[0] = row_type.to_string();
    row
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
