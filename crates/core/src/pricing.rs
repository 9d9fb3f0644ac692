//! Discount aggregation engine.
//!
//! Both estimator flows (attribute options picked per device, and yes/no
//! evaluation criteria matched by brand) reduce to the same computation:
//! a base price minus a list of discount modifiers, clamped at zero.
//! This module holds that single engine plus the brand-matching rule for
//! criteria; assembling the modifier list from catalog data happens in
//! `tradein-service`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money;

// ---------------------------------------------------------------------------
// Discount kinds
// ---------------------------------------------------------------------------

/// How an attribute option's discount magnitude is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// Absolute currency subtraction.
    Fixed,
    /// Percent of the *original* base price.
    Percentage,
}

impl DiscountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Percentage => "percentage",
        }
    }

    /// Parse a stored or imported discount type (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fixed" => Some(Self::Fixed),
            "percentage" => Some(Self::Percentage),
            _ => None,
        }
    }
}

impl std::fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// One selected discount, already resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub kind: DiscountKind,
    /// Currency units for `Fixed`, percent of base price for `Percentage`.
    pub amount: Decimal,
}

impl Modifier {
    pub fn fixed(amount: Decimal) -> Self {
        Self {
            kind: DiscountKind::Fixed,
            amount,
        }
    }

    pub fn percentage(amount: Decimal) -> Self {
        Self {
            kind: DiscountKind::Percentage,
            amount,
        }
    }
}

/// The discount a single modifier takes off the price.
///
/// Percentages are always computed against the original base price, not
/// the running total: discounts do not compound.
pub fn discount_amount(base_price: Decimal, modifier: &Modifier) -> Decimal {
    match modifier.kind {
        DiscountKind::Fixed => modifier.amount,
        DiscountKind::Percentage => base_price * modifier.amount / Decimal::ONE_HUNDRED,
    }
}

/// Apply a modifier list to a base price.
///
/// `final = max(0, base_price − Σ discounts)`, rounded to two decimal
/// places. Summation order is irrelevant; each modifier only ever sees
/// the original base price.
pub fn apply_modifiers(base_price: Decimal, modifiers: &[Modifier]) -> Decimal {
    let total: Decimal = modifiers
        .iter()
        .map(|m| discount_amount(base_price, m))
        .sum();
    money::round_amount((base_price - total).max(Decimal::ZERO))
}

// ---------------------------------------------------------------------------
// Criterion brand matching
// ---------------------------------------------------------------------------

/// The brand-list value meaning "applies to every brand".
pub const ALL_BRANDS: &str = "All";

/// Whether a criterion's brand list covers the given device brand.
///
/// A criterion applies when its list is the `All` sentinel or contains
/// the brand (case-insensitive substring over the comma-separated list,
/// matching how the lists are stored). An empty brand only ever matches
/// the sentinel.
pub fn criterion_applies(applicable_brands: &str, brand: &str) -> bool {
    let list = applicable_brands.trim();
    if list.eq_ignore_ascii_case(ALL_BRANDS) {
        return true;
    }
    let brand = brand.trim();
    if brand.is_empty() {
        return false;
    }
    list.to_lowercase().contains(&brand.to_lowercase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    // -- apply_modifiers --

    #[test]
    fn no_modifiers_returns_base() {
        assert_eq!(apply_modifiers(dec("250.00"), &[]), dec("250.00"));
    }

    #[test]
    fn fixed_discounts_subtract() {
        let mods = [Modifier::fixed(dec("10")), Modifier::fixed(dec("15.50"))];
        assert_eq!(apply_modifiers(dec("100"), &mods), dec("74.50"));
    }

    #[test]
    fn oversized_fixed_discount_clamps_to_zero() {
        let mods = [Modifier::fixed(dec("150"))];
        assert_eq!(apply_modifiers(dec("100"), &mods), Decimal::ZERO);
    }

    #[test]
    fn percentage_uses_original_base() {
        // 200 − 10% − 20% = 200 − 20 − 40 = 140.
        let mods = [
            Modifier::percentage(dec("10")),
            Modifier::percentage(dec("20")),
        ];
        assert_eq!(apply_modifiers(dec("200"), &mods), dec("140.00"));
    }

    #[test]
    fn percentages_do_not_compound() {
        // Two 50% discounts exhaust the price entirely; compounding
        // would leave 25.
        let mods = [
            Modifier::percentage(dec("50")),
            Modifier::percentage(dec("50")),
        ];
        assert_eq!(apply_modifiers(dec("100"), &mods), Decimal::ZERO);
    }

    #[test]
    fn mixed_kinds_combine() {
        // 300 − 30 (10%) − 45 = 225.
        let mods = [Modifier::percentage(dec("10")), Modifier::fixed(dec("45"))];
        assert_eq!(apply_modifiers(dec("300"), &mods), dec("225.00"));
    }

    #[test]
    fn fractional_percentage_rounds_to_cents() {
        // 99.99 × 12.5% = 12.49875 → final 87.49125 → 87.49.
        let mods = [Modifier::percentage(dec("12.5"))];
        assert_eq!(apply_modifiers(dec("99.99"), &mods), dec("87.49"));
    }

    #[test]
    fn zero_base_stays_zero() {
        let mods = [Modifier::percentage(dec("50")), Modifier::fixed(dec("10"))];
        assert_eq!(apply_modifiers(Decimal::ZERO, &mods), Decimal::ZERO);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = [Modifier::fixed(dec("20")), Modifier::percentage(dec("30"))];
        let reverse = [Modifier::percentage(dec("30")), Modifier::fixed(dec("20"))];
        assert_eq!(
            apply_modifiers(dec("180"), &forward),
            apply_modifiers(dec("180"), &reverse)
        );
    }

    // -- DiscountKind::parse --

    #[test]
    fn parse_known_kinds() {
        assert_eq!(DiscountKind::parse("fixed"), Some(DiscountKind::Fixed));
        assert_eq!(
            DiscountKind::parse("percentage"),
            Some(DiscountKind::Percentage)
        );
        assert_eq!(DiscountKind::parse(" Fixed "), Some(DiscountKind::Fixed));
    }

    #[test]
    fn parse_unknown_kind() {
        assert_eq!(DiscountKind::parse("percent"), None);
        assert_eq!(DiscountKind::parse(""), None);
    }

    // -- criterion_applies --

    #[test]
    fn all_sentinel_matches_every_brand() {
        assert!(criterion_applies("All", "Samsung"));
        assert!(criterion_applies("all", "Nokia"));
        assert!(criterion_applies("All", ""));
    }

    #[test]
    fn listed_brands_match() {
        assert!(criterion_applies("Samsung,Apple", "Samsung"));
        assert!(criterion_applies("Samsung,Apple", "Apple"));
        assert!(criterion_applies("Samsung, Apple", "apple"));
    }

    #[test]
    fn unlisted_brand_does_not_match() {
        assert!(!criterion_applies("Samsung,Apple", "Nokia"));
    }

    #[test]
    fn empty_brand_only_matches_sentinel() {
        assert!(!criterion_applies("Samsung,Apple", ""));
        assert!(!criterion_applies("Samsung,Apple", "   "));
    }
}
