//! # Order-Line Policy Enforcer
//!
//! Checks a proposed order line against the minimum sale price and the
//! markup-derived discount ceiling.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  effective = unit_price × (1 − discount / 100)                          │
//! │                                                                         │
//! │  BELOW MINIMUM        min_sale > 0  and  effective < min_sale          │
//! │                                                                         │
//! │  EXCESSIVE DISCOUNT   markup > 0 and list > 0                          │
//! │                       max = markup × K / list × 100                    │
//! │                       discount > max                                   │
//! │                                                                         │
//! │  Both rules run independently; a line can break both.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Where It Runs
//! ```text
//! Line entry (interactive) ──► check ──► warn operator
//!                                          │
//! Order finalization ────────► check ──► reject order   ← authoritative
//! ```
//! The interactive check can be bypassed, so finalization always re-runs it.
//! Nothing is clamped: violations carry the exact numbers that failed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{CoreError, CoreResult};
use crate::money::{apply_percentage_discount, percentage_of};
use crate::types::PricingPolicy;

// =============================================================================
// Violations
// =============================================================================

/// A broken pricing rule, with the numbers that broke it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PolicyViolation {
    /// The discounted price falls under the item's minimum sale price.
    #[error("price {effective_price} is below the minimum sale price {min_sale_price}")]
    BelowMinimum {
        effective_price: Decimal,
        min_sale_price: Decimal,
    },

    /// The discount gives away more markup than the policy allows.
    #[error("discount {discount_pct}% exceeds the maximum {max_discount_pct}%")]
    ExcessiveDiscount {
        discount_pct: Decimal,
        max_discount_pct: Decimal,
    },
}

// =============================================================================
// Line Proposal
// =============================================================================

/// The numbers of one proposed order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineProposal {
    /// Unit price the operator entered (before discount).
    pub final_unit_price: Decimal,

    /// Line discount in percent.
    pub discount_pct: Decimal,

    /// Item's stored minimum sale price; zero means "not set".
    pub min_sale_price: Decimal,

    /// Markup per gram × weight for the item.
    pub markup_total: Decimal,

    /// Item's list (sale) price.
    pub list_price: Decimal,
}

impl LineProposal {
    /// Price after the line discount, unrounded.
    pub fn effective_price(&self) -> Decimal {
        apply_percentage_discount(self.final_unit_price, self.discount_pct)
    }
}

// =============================================================================
// Line Policy
// =============================================================================

/// The enforcer, parameterized by the retention fraction K.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePolicy {
    retention: Decimal,
}

impl LinePolicy {
    /// Uses the same retention fraction as the price formula.
    pub fn new(policy: &PricingPolicy) -> Self {
        LinePolicy {
            retention: policy.retention(),
        }
    }

    /// Highest discount the markup rule allows, or `None` when the rule does
    /// not apply (no markup or no list price).
    pub fn max_discount_pct(&self, markup_total: Decimal, list_price: Decimal) -> Option<Decimal> {
        if markup_total <= Decimal::ZERO || list_price <= Decimal::ZERO {
            return None;
        }
        Some(percentage_of(markup_total * self.retention, list_price))
    }

    /// Returns every rule the line breaks; empty when the line is acceptable.
    pub fn check(&self, line: &LineProposal) -> Vec<PolicyViolation> {
        let mut violations = Vec::new();

        if line.min_sale_price > Decimal::ZERO {
            let effective_price = line.effective_price();
            if effective_price < line.min_sale_price {
                violations.push(PolicyViolation::BelowMinimum {
                    effective_price,
                    min_sale_price: line.min_sale_price,
                });
            }
        }

        if let Some(max_discount_pct) = self.max_discount_pct(line.markup_total, line.list_price) {
            if line.discount_pct > max_discount_pct {
                violations.push(PolicyViolation::ExcessiveDiscount {
                    discount_pct: line.discount_pct,
                    max_discount_pct,
                });
            }
        }

        violations
    }

    /// Accepts the line or fails with all of its violations.
    pub fn validate(&self, line: &LineProposal) -> CoreResult<()> {
        let violations = self.check(line);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(CoreError::PolicyViolation { violations })
        }
    }

    /// Largest discount that passes both rules, for operator hints.
    ///
    /// Never used to rewrite a proposal; finalization rejects instead.
    pub fn max_allowed_discount(&self, line: &LineProposal) -> Decimal {
        let mut allowed = Decimal::ONE_HUNDRED;

        if let Some(max_discount_pct) = self.max_discount_pct(line.markup_total, line.list_price) {
            allowed = allowed.min(max_discount_pct);
        }

        if line.min_sale_price > Decimal::ZERO && line.final_unit_price > Decimal::ZERO {
            let floor_pct = percentage_of(
                line.final_unit_price - line.min_sale_price,
                line.final_unit_price,
            );
            allowed = allowed.min(floor_pct);
        }

        allowed.max(Decimal::ZERO)
    }
}

impl Default for LinePolicy {
    fn default() -> Self {
        LinePolicy::new(&PricingPolicy::default())
    }
}

/// Validates one order line in a single call.
///
/// ## Example
/// ```rust
/// use aurum_core::policy::validate_line;
/// use rust_decimal::Decimal;
///
/// // 90 at 10% off is 81, under the 85 minimum
/// let result = validate_line(
///     Decimal::from(90),
///     Decimal::from(10),
///     Decimal::from(85),
///     Decimal::ZERO,
///     Decimal::ZERO,
///     Decimal::new(5, 1),
/// );
/// assert!(result.is_err());
/// ```
pub fn validate_line(
    final_unit_price: Decimal,
    discount_pct: Decimal,
    min_sale_price: Decimal,
    markup_total: Decimal,
    list_price: Decimal,
    retention: Decimal,
) -> CoreResult<()> {
    let policy = LinePolicy { retention };
    policy.validate(&LineProposal {
        final_unit_price,
        discount_pct,
        min_sale_price,
        markup_total,
        list_price,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
