//! # Price Formula
//!
//! Turns (base price, purity, weight, markup) into a [`PriceQuote`].
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      compute_price                                      │
//! │                                                                         │
//! │  adjusted  = base_price × purity_ratio          (exact fraction)        │
//! │  cost      = round2(adjusted × weight)                                  │
//! │  markup    = round2(markup_per_gram × weight)                           │
//! │  sale      = round2(cost + markup)                                      │
//! │  min_sale  = round2(cost + markup × K)                                  │
//! │                                                                         │
//! │  optional: sale, min_sale → nearest multiple of denomination,          │
//! │            each from its own cent-rounded value                         │
//! │                                                                         │
//! │  Example (21K, base 100, 10 g, markup 5/g, K = 0.5):                   │
//! │    cost 1000.00, markup 50.00, sale 1050.00, min_sale 1025.00          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step is `rust_decimal` arithmetic with half-up rounding.

use rust_decimal::Decimal;

use crate::error::{CoreResult, ValidationError};
use crate::money::{checked_add, checked_mul, round2, round_to_denomination, too_large};
use crate::types::{PriceQuote, PricingPolicy, Purity};
use crate::validation::{validate_base_price, validate_markup, validate_weight};

// =============================================================================
// Gold
// =============================================================================

/// Computes cost, sale and minimum sale prices for a gold item.
///
/// ## Preconditions
/// Each failure is a distinct [`ValidationError`]:
/// - purity ratio must be positive
/// - `weight_g > 0`
/// - `base_price > 0`
/// - `markup_per_gram ≥ 0`
///
/// An intermediate amount that does not fit in a decimal fails with
/// [`ValidationError::TooLarge`] instead of panicking.
///
/// ## Example
/// ```rust
/// use aurum_core::pricing::compute_price;
/// use aurum_core::{PricingPolicy, Purity};
/// use rust_decimal::Decimal;
///
/// let quote = compute_price(
///     Decimal::from(100),
///     Purity::K21,
///     Decimal::from(10),
///     Decimal::from(5),
///     &PricingPolicy::default(),
/// )
/// .unwrap();
///
/// assert_eq!(quote.cost_price, Decimal::from(1000));
/// assert_eq!(quote.sale_price, Decimal::from(1050));
/// assert_eq!(quote.min_sale_price, Decimal::from(1025));
/// ```
pub fn compute_price(
    base_price: Decimal,
    purity: Purity,
    weight_g: Decimal,
    markup_per_gram: Decimal,
    policy: &PricingPolicy,
) -> CoreResult<PriceQuote> {
    let ratio = purity.ratio();
    if !ratio.is_positive() {
        return Err(ValidationError::UnsupportedPurity(purity.to_string()).into());
    }
    validate_weight(weight_g)?;
    validate_base_price(base_price)?;
    validate_markup(markup_per_gram)?;

    let adjusted_price = ratio
        .apply(base_price)
        .ok_or_else(|| too_large("Adjusted gold price"))?;
    let cost_price = round2(checked_mul("Cost price", adjusted_price, weight_g)?);
    let markup_total = round2(checked_mul("Markup total", markup_per_gram, weight_g)?);

    let mut sale_price = round2(checked_add("Sale price", cost_price, markup_total)?);
    let retained = checked_mul("Retained markup", markup_total, policy.retention())?;
    let mut min_sale_price = round2(checked_add("Minimum sale price", cost_price, retained)?);

    if let Some(denomination) = policy.coarse_rounding() {
        sale_price = round_to_denomination(sale_price, denomination)
            .ok_or_else(|| too_large("Sale price"))?;
        min_sale_price = round_to_denomination(min_sale_price, denomination)
            .ok_or_else(|| too_large("Minimum sale price"))?;
    }

    Ok(PriceQuote {
        cost_price,
        sale_price,
        min_sale_price,
        markup_total,
    })
}

/// Same as [`compute_price`] but takes the purity as a catalog code.
pub fn compute_price_for_code(
    base_price: Decimal,
    purity_code: &str,
    weight_g: Decimal,
    markup_per_gram: Decimal,
    policy: &PricingPolicy,
) -> CoreResult<PriceQuote> {
    let purity: Purity = purity_code.parse()?;
    compute_price(base_price, purity, weight_g, markup_per_gram, policy)
}

// =============================================================================
// Diamond
// =============================================================================

/// Highest global diamond discount accepted, in percent.
pub const MAX_DIAMOND_DISCOUNT_PCT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Clamps a configured diamond discount into `0..=80`.
pub fn clamp_diamond_discount(discount_pct: Decimal) -> Decimal {
    discount_pct.clamp(Decimal::ZERO, MAX_DIAMOND_DISCOUNT_PCT)
}

/// Computes a diamond list price from its USD ticket price.
///
/// `usd_price × usd_rate × (100 − discount) / 100`, rounded to cents. The
/// discount is clamped into `0..=80` first.
pub fn compute_diamond_price(
    usd_price: Decimal,
    usd_rate: Decimal,
    discount_pct: Decimal,
) -> CoreResult<Decimal> {
    if usd_price <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "Diamond USD price".to_string(),
            value: usd_price,
        }
        .into());
    }
    if usd_rate <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "USD exchange rate".to_string(),
            value: usd_rate,
        }
        .into());
    }

    let discount = clamp_diamond_discount(discount_pct);
    let kept = (Decimal::ONE_HUNDRED - discount) / Decimal::ONE_HUNDRED;
    let local_price = checked_mul("Diamond price", usd_price, usd_rate)?;
    Ok(round2(checked_mul("Diamond price", local_price, kept)?))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use rust_decimal_macros::dec;

    fn policy(retention: Decimal, coarse: Option<Decimal>) -> PricingPolicy {
        PricingPolicy::new(retention, coarse).unwrap()
    }

    #[test]
    fn test_compute_21k_price() {
        let policy = policy(dec!(0.5), None);
        let quote = compute_price(dec!(100), Purity::K21, dec!(10), dec!(5), &policy).unwrap();
        assert_eq!(quote.cost_price, dec!(1000.00));
        assert_eq!(quote.markup_total, dec!(50.00));
        assert_eq!(quote.sale_price, dec!(1050.00));
        assert_eq!(quote.min_sale_price, dec!(1025.00));
    }

    #[test]
    fn test_coarse_rounding_with_seventy_percent_retention() {
        let policy = policy(dec!(0.7), Some(dec!(50)));
        let quote = compute_price(dec!(100), Purity::K21, dec!(10), dec!(5), &policy).unwrap();
        assert_eq!(quote.cost_price, dec!(1000.00));
        assert_eq!(quote.markup_total, dec!(50.00));
        assert_eq!(quote.sale_price, dec!(1050));
        // raw minimum 1035.00 rounds on its own, not from the rounded sale
        assert_eq!(quote.min_sale_price, dec!(1050));
    }

    #[test]
    fn test_compute_24k_price() {
        let default = PricingPolicy::default();
        let quote = compute_price(dec!(100), Purity::K24, dec!(1), dec!(10), &default).unwrap();
        assert_eq!(quote.cost_price, dec!(114.29));
        assert_eq!(quote.sale_price, dec!(124.29));
        assert_eq!(quote.min_sale_price, dec!(119.29));

        let policy = policy(dec!(0.5), Some(dec!(50)));
        let coarse = compute_price(dec!(100), Purity::K24, dec!(1), dec!(10), &policy).unwrap();
        assert_eq!(coarse.sale_price, dec!(100));
    }

    #[test]
    fn test_compute_18k_price() {
        let policy = policy(dec!(0.7), Some(dec!(50)));
        let quote = compute_price(dec!(100.0), Purity::K18, dec!(8.0), dec!(5.0), &policy).unwrap();
        assert_eq!(quote.cost_price, dec!(700.00));
        assert_eq!(quote.sale_price, dec!(750));
        assert_eq!(quote.min_sale_price, dec!(750));
    }

    #[test]
    fn test_zero_markup() {
        let policy = PricingPolicy::default();
        let quote = compute_price(dec!(100.0), Purity::K21, dec!(10.0), dec!(0), &policy).unwrap();
        assert_eq!(quote.cost_price, dec!(1000.00));
        assert_eq!(quote.sale_price, dec!(1000.00));
        assert_eq!(quote.min_sale_price, dec!(1000.00));
        assert!(quote.is_unpriced());
    }

    #[test]
    fn test_zero_weight_raises_error() {
        let policy = PricingPolicy::default();
        let err = compute_price(dec!(100), Purity::K21, dec!(0), dec!(5), &policy).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ValidationError::MustBePositive { .. })));
        assert!(err.to_string().contains("Weight must be greater than 0"));
    }

    #[test]
    fn test_negative_markup_raises_error() {
        let policy = PricingPolicy::default();
        let err =
            compute_price(dec!(100.0), Purity::K21, dec!(10.0), dec!(-5.0), &policy).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ValidationError::MustNotBeNegative { .. })));
        assert!(err.to_string().contains("Markup cannot be negative"));
    }

    #[test]
    fn test_non_positive_base_price_raises_error() {
        let policy = PricingPolicy::default();
        let err = compute_price(dec!(0), Purity::K21, dec!(10.0), dec!(5.0), &policy).unwrap_err();
        assert!(err.to_string().contains("Base gold price must be greater than 0"));
    }

    #[test]
    fn test_invalid_purity_code_raises_error() {
        let policy = PricingPolicy::default();
        let err = compute_price_for_code(dec!(100), "99K", dec!(10), dec!(5), &policy).unwrap_err();
        assert!(err.to_string().contains("Invalid purity: 99K"));

        let quote = compute_price_for_code(dec!(100), "18K", dec!(8), dec!(0), &policy).unwrap();
        assert_eq!(quote.cost_price, dec!(700.00));
    }

    #[test]
    fn test_cent_rounding_is_half_up() {
        // 10K: 100 × 10/21 × 0.21 g = 10.00; markup 0.5 × 0.21 g = 0.105 → 0.11
        let policy = PricingPolicy::default();
        let quote = compute_price(dec!(100), Purity::K10, dec!(0.21), dec!(0.5), &policy).unwrap();
        assert_eq!(quote.cost_price, dec!(10.00));
        assert_eq!(quote.markup_total, dec!(0.11));
    }

    #[test]
    fn test_oversized_amounts_fail_instead_of_panicking() {
        let policy = PricingPolicy::default();

        let err = compute_price(dec!(5415), Purity::K21, dec!(10), Decimal::MAX, &policy)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidInput(ValidationError::TooLarge { ref field })
                if field == "Markup total"
        ));

        let err = compute_price(Decimal::MAX, Purity::K24, dec!(1), dec!(0), &policy).unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert!(err.is_item_error());

        let err = compute_diamond_price(Decimal::MAX, dec!(50), dec!(80)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ValidationError::TooLarge { .. })));
    }

    #[test]
    fn test_diamond_price() {
        // 1000 USD × 50 × (100 − 80) / 100 = 10000
        assert_eq!(
            compute_diamond_price(dec!(1000), dec!(50), dec!(80)).unwrap(),
            dec!(10000)
        );
        // discount above 80 is clamped
        assert_eq!(
            compute_diamond_price(dec!(1000), dec!(50), dec!(95)).unwrap(),
            dec!(10000)
        );
        // negative discount is clamped to zero
        assert_eq!(
            compute_diamond_price(dec!(10), dec!(50), dec!(-5)).unwrap(),
            dec!(500)
        );
        assert!(compute_diamond_price(dec!(0), dec!(50), dec!(80)).is_err());
        assert!(compute_diamond_price(dec!(10), dec!(0), dec!(80)).is_err());
    }
}
