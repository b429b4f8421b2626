//! # Order Guard
//!
//! Runs the order-line policy when a line is entered and again when the
//! order is finalized.
//!
//! ## Two Checkpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Operator enters line ──► check_line() ──► LineCheck                   │
//! │                            (warns, returns hint, blocks nothing)       │
//! │                                                                         │
//! │  Operator pays ─────────► finalize(lines)                              │
//! │                            │                                            │
//! │                            ├── line 0 ok                                │
//! │                            ├── line 1 violates ──► OrderRejected{1}    │
//! │                            └── (stops at the first rejected line)      │
//! │                                                                         │
//! │  Markup total is re-derived from the config snapshot for every gold    │
//! │  line. Diamond and silver lines are not checked.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use aurum_core::markup::resolve_markup;
use aurum_core::money::{checked_mul, round2};
use aurum_core::validation::{validate_discount_pct, validate_weight};
use aurum_core::{
    GoldType, JewelleryType, LinePolicy, LineProposal, PolicyViolation, ValidationError,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PricingConfig;
use crate::error::{ServiceError, ServiceResult};

// =============================================================================
// Order Line
// =============================================================================

/// One line of a proposed order, with the product's stored prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: String,

    /// Catalog category code of the product.
    pub jewellery_type: String,

    /// Product weight in grams. Required for gold lines.
    #[serde(default)]
    pub weight_g: Option<Decimal>,

    /// Stored list price of the product.
    pub list_price: Decimal,

    /// Stored minimum sale price of the product; zero when never priced.
    #[serde(default)]
    pub min_sale_price: Decimal,

    /// Unit price entered by the operator.
    pub unit_price: Decimal,

    /// Line discount in percent.
    #[serde(default)]
    pub discount_pct: Decimal,
}

/// Result of an interactive line check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCheck {
    /// False for lines the policy does not cover.
    pub checked: bool,
    pub violations: Vec<PolicyViolation>,
    /// Largest discount that would pass, for gold lines.
    pub max_allowed_discount: Option<Decimal>,
}

impl LineCheck {
    pub fn is_acceptable(&self) -> bool {
        self.violations.is_empty()
    }
}

// =============================================================================
// Guard
// =============================================================================

/// Applies the line policy using a configuration snapshot.
#[derive(Debug, Clone)]
pub struct OrderGuard {
    config: PricingConfig,
    policy: LinePolicy,
}

impl OrderGuard {
    pub fn new(config: PricingConfig) -> ServiceResult<Self> {
        let policy = LinePolicy::new(&config.pricing_policy()?);
        Ok(OrderGuard { config, policy })
    }

    /// Checks a line as it is entered. Violations are reported, not raised.
    pub fn check_line(&self, line: &OrderLine) -> ServiceResult<LineCheck> {
        let Some(proposal) = self.proposal(line)? else {
            return Ok(LineCheck {
                checked: false,
                violations: Vec::new(),
                max_allowed_discount: None,
            });
        };

        let violations = self.policy.check(&proposal);
        if !violations.is_empty() {
            warn!(
                product_id = %line.product_id,
                unit_price = %line.unit_price,
                discount_pct = %line.discount_pct,
                violations = violations.len(),
                "Order line breaks pricing policy"
            );
        }

        Ok(LineCheck {
            checked: true,
            violations,
            max_allowed_discount: Some(self.policy.max_allowed_discount(&proposal)),
        })
    }

    /// Re-checks every line before the order is committed.
    ///
    /// Fails with [`ServiceError::OrderRejected`] at the first violating line.
    pub fn finalize(&self, lines: &[OrderLine]) -> ServiceResult<()> {
        for (index, line) in lines.iter().enumerate() {
            let Some(proposal) = self.proposal(line)? else {
                continue;
            };

            let violations = self.policy.check(&proposal);
            if !violations.is_empty() {
                warn!(
                    line = index,
                    product_id = %line.product_id,
                    "Order rejected at finalization"
                );
                return Err(ServiceError::OrderRejected {
                    line: index,
                    violations,
                });
            }
        }

        info!(lines = lines.len(), "Order lines passed pricing policy");
        Ok(())
    }

    /// Builds the policy proposal for a gold line, or `None` for lines the
    /// policy does not cover.
    fn proposal(&self, line: &OrderLine) -> ServiceResult<Option<LineProposal>> {
        let jewellery_type: JewelleryType = line.jewellery_type.parse()?;
        let Some(gold_type) = jewellery_type.gold_type() else {
            return Ok(None);
        };

        validate_discount_pct(line.discount_pct)?;
        let weight_g = line.weight_g.ok_or_else(|| ValidationError::Required {
            field: "Weight".to_string(),
        })?;
        validate_weight(weight_g)?;

        Ok(Some(LineProposal {
            final_unit_price: line.unit_price,
            discount_pct: line.discount_pct,
            min_sale_price: line.min_sale_price,
            markup_total: self.markup_total(gold_type, weight_g)?,
            list_price: line.list_price,
        }))
    }

    fn markup_total(&self, gold_type: GoldType, weight_g: Decimal) -> ServiceResult<Decimal> {
        let markup_per_gram = resolve_markup(&self.config, gold_type, Some(weight_g));
        Ok(round2(checked_mul("Markup total", markup_per_gram, weight_g)?))
    }
}
