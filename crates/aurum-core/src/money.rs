//! # Money Module
//!
//! Rounding primitives for monetary values.
//!
//! ## Why Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    100 × 8/7 × 1.0 = 114.28571428571428 → round → 114.29 (usually)     │
//! │    1.005 rounds to 1.00 because 1.005 is really 1.00499999...  ❌       │
//! │                                                                         │
//! │  A gold quote multiplies and rounds several times (cost, markup,        │
//! │  sale, minimum). Every step can drift by a cent.                        │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    Base-10 fixed point, 28 significant digits, explicit rounding.      │
//! │    1.005 → round2 → 1.01  ✅                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Floating point only appears at the outbound edge ([`to_f64`]).
//!
//! ## Usage
//! ```rust
//! use aurum_core::money::{round2, round_to_denomination};
//! use rust_decimal::Decimal;
//!
//! let raw = Decimal::new(1005, 3); // 1.005
//! assert_eq!(round2(raw), Decimal::new(101, 2)); // 1.01
//!
//! let sale = Decimal::new(103500, 2); // 1035.00
//! let coarse = round_to_denomination(sale, Decimal::from(50));
//! assert_eq!(coarse, Some(Decimal::from(1050)));
//! ```
//!
//! ## Overflow
//! `Decimal` operators panic when a result leaves the 96-bit range. Price
//! steps go through [`checked_mul`] and [`checked_add`], which report
//! [`ValidationError::TooLarge`] naming the amount being computed.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ValidationError;

/// Monetary values are stored with two decimal places.
pub const MONEY_SCALE: u32 = 2;

/// One hundred, for percentage math.
const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

// =============================================================================
// Rounding
// =============================================================================

/// Rounds to two decimal places, halves away from zero.
///
/// ## Half-Up vs Bankers
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────┐
/// │  value     half-up (THIS)     bankers (half-even)                   │
/// │  0.125  →  0.13               0.12                                  │
/// │  0.135  →  0.14               0.14                                  │
/// │  1.005  →  1.01               1.00                                  │
/// └─────────────────────────────────────────────────────────────────────┘
/// ```
/// Jewellery price boards quote half-up, so every price step uses it.
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest multiple of `denomination`, halves away from zero.
///
/// Used for coarse price-board rounding (e.g. nearest 50). A non-positive
/// denomination leaves the value untouched. Returns `None` when the rounded
/// amount does not fit in a decimal.
///
/// ## Example
/// ```text
/// 1035.00 / 50 = 20.7  → 21 × 50 = 1050
/// 124.29  / 50 = 2.49  →  2 × 50 = 100
/// 1025.00 / 50 = 20.5  → 21 × 50 = 1050   (half rounds up)
/// ```
pub fn round_to_denomination(value: Decimal, denomination: Decimal) -> Option<Decimal> {
    if denomination <= Decimal::ZERO {
        return Some(value);
    }
    let units = value
        .checked_div(denomination)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    units.checked_mul(denomination).map(round2)
}

// =============================================================================
// Checked Arithmetic
// =============================================================================

/// `lhs × rhs`, or [`ValidationError::TooLarge`] for `field`.
pub fn checked_mul(field: &str, lhs: Decimal, rhs: Decimal) -> Result<Decimal, ValidationError> {
    lhs.checked_mul(rhs).ok_or_else(|| too_large(field))
}

/// `lhs + rhs`, or [`ValidationError::TooLarge`] for `field`.
pub fn checked_add(field: &str, lhs: Decimal, rhs: Decimal) -> Result<Decimal, ValidationError> {
    lhs.checked_add(rhs).ok_or_else(|| too_large(field))
}

pub(crate) fn too_large(field: &str) -> ValidationError {
    ValidationError::TooLarge {
        field: field.to_string(),
    }
}

// =============================================================================
// Percentages
// =============================================================================

/// Applies a percentage discount: `price × (1 − discount_pct / 100)`.
///
/// The result is exact (not rounded) so policy comparisons see the true value.
/// An unrepresentable result saturates at `Decimal::MAX` or `Decimal::MIN`.
#[inline]
pub fn apply_percentage_discount(price: Decimal, discount_pct: Decimal) -> Decimal {
    let negative = price.is_sign_negative() != (discount_pct > HUNDRED);
    Decimal::ONE
        .checked_sub(discount_pct / HUNDRED)
        .and_then(|factor| price.checked_mul(factor))
        .unwrap_or_else(|| saturated(negative))
}

/// Expresses `part` as a percentage of `whole`. Returns zero when `whole` is zero.
///
/// Saturates like [`apply_percentage_discount`].
#[inline]
pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    let negative = part.is_sign_negative() != whole.is_sign_negative();
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .unwrap_or_else(|| saturated(negative))
}

fn saturated(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

// =============================================================================
// Float Boundary
// =============================================================================

/// Converts a float supplied by a caller into a decimal.
///
/// Returns `None` for NaN or infinities.
#[inline]
pub fn from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

/// Converts a decimal to a float for callers that store floats.
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(dec!(0.125)), dec!(0.13));
        assert_eq!(round2(dec!(1.005)), dec!(1.01));
        assert_eq!(round2(dec!(114.285714)), dec!(114.29));
        assert_eq!(round2(dec!(1000)), dec!(1000));
    }

    #[test]
    fn test_round_to_denomination() {
        assert_eq!(
            round_to_denomination(dec!(1035.00), dec!(50)),
            Some(dec!(1050))
        );
        assert_eq!(
            round_to_denomination(dec!(1050.00), dec!(50)),
            Some(dec!(1050))
        );
        assert_eq!(
            round_to_denomination(dec!(124.29), dec!(50)),
            Some(dec!(100))
        );
        assert_eq!(
            round_to_denomination(dec!(740.00), dec!(50)),
            Some(dec!(750))
        );
        assert_eq!(
            round_to_denomination(dec!(1025.00), dec!(50)),
            Some(dec!(1050))
        );
    }

    #[test]
    fn test_round_to_denomination_ignores_non_positive() {
        assert_eq!(
            round_to_denomination(dec!(1035.00), dec!(0)),
            Some(dec!(1035.00))
        );
        assert_eq!(
            round_to_denomination(dec!(1035.00), dec!(-50)),
            Some(dec!(1035.00))
        );
    }

    #[test]
    fn test_round_to_denomination_overflow() {
        assert_eq!(round_to_denomination(Decimal::MAX, dec!(0.01)), None);
        // MAX / 50 rounds up one unit, which no longer fits
        assert_eq!(round_to_denomination(Decimal::MAX, dec!(50)), None);
    }

    #[test]
    fn test_checked_arithmetic() {
        assert_eq!(
            checked_mul("Cost price", dec!(5415), dec!(10)),
            Ok(dec!(54150))
        );
        assert_eq!(
            checked_add("Sale price", dec!(1000), dec!(50)),
            Ok(dec!(1050))
        );

        let err = checked_mul("Markup total", Decimal::MAX, dec!(10)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLarge {
                field: "Markup total".to_string()
            }
        );
        assert!(checked_add("Sale price", Decimal::MAX, dec!(1)).is_err());
    }

    #[test]
    fn test_percentage_discount() {
        assert_eq!(apply_percentage_discount(dec!(90), dec!(10)), dec!(81));
        assert_eq!(apply_percentage_discount(dec!(100), dec!(0)), dec!(100));
    }

    #[test]
    fn test_percentage_discount_saturates() {
        assert_eq!(
            apply_percentage_discount(Decimal::MAX, dec!(-50)),
            Decimal::MAX
        );
        assert_eq!(
            apply_percentage_discount(Decimal::MAX, dec!(300)),
            Decimal::MIN
        );
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(percentage_of(dec!(25), dec!(1050)).round_dp(2), dec!(2.38));
        assert_eq!(percentage_of(dec!(25), dec!(0)), dec!(0));
    }

    #[test]
    fn test_percentage_of_saturates() {
        assert_eq!(percentage_of(Decimal::MAX, dec!(0.01)), Decimal::MAX);
        assert_eq!(percentage_of(Decimal::MAX, dec!(-0.01)), Decimal::MIN);
    }

    #[test]
    fn test_float_boundary() {
        assert_eq!(from_f64(1050.5), Some(dec!(1050.5)));
        assert_eq!(from_f64(f64::NAN), None);
        assert_eq!(to_f64(dec!(1050.00)), 1050.0);
    }
}
