//! Fixed-point money helpers.
//!
//! Prices and discount magnitudes are persisted as integer minor units
//! (two implied decimal places) and converted to [`Decimal`] at the model
//! boundary, so all arithmetic stays exact.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of implied decimal places in stored amounts.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Convert stored minor units (e.g. cents) into a decimal amount.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

/// Convert a decimal amount into minor units, rounding half-up to two
/// decimal places. Returns `None` when the value does not fit in `i64`.
pub fn to_minor_units(value: Decimal) -> Option<i64> {
    let rounded =
        value.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    (rounded * Decimal::ONE_HUNDRED).to_i64()
}

/// Round a computed amount to two decimal places (half-up).
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse an amount cell from interchange data.
///
/// Mirrors the tolerant numeric coercion of the data this format evolved
/// around: unparseable input becomes zero, negative input is clamped to
/// zero. Admin mutations reject negatives instead; this path never fails
/// a whole row over a bad number.
pub fn parse_amount(raw: &str) -> Decimal {
    raw.trim()
        .parse::<Decimal>()
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_units_round_trip() {
        let amount = from_minor_units(19_999);
        assert_eq!(amount.to_string(), "199.99");
        assert_eq!(to_minor_units(amount), Some(19_999));
    }

    #[test]
    fn zero_round_trip() {
        assert_eq!(to_minor_units(from_minor_units(0)), Some(0));
    }

    #[test]
    fn to_minor_units_rounds_half_up() {
        assert_eq!(to_minor_units("10.005".parse().unwrap()), Some(1_001));
        assert_eq!(to_minor_units("10.004".parse().unwrap()), Some(1_000));
    }

    #[test]
    fn parse_amount_plain_value() {
        assert_eq!(parse_amount("149.50"), Decimal::new(14_950, 2));
    }

    #[test]
    fn parse_amount_trims_whitespace() {
        assert_eq!(parse_amount("  25 "), Decimal::new(25, 0));
    }

    #[test]
    fn parse_amount_garbage_is_zero() {
        assert_eq!(parse_amount("n/a"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_clamps_negative() {
        assert_eq!(parse_amount("-5.00"), Decimal::ZERO);
    }

    #[test]
    fn round_amount_two_places() {
        assert_eq!(round_amount("33.333".parse().unwrap()).to_string(), "33.33");
        assert_eq!(round_amount("33.335".parse().unwrap()).to_string(), "33.34");
    }
}
