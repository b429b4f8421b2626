//! # Batch Repricer
//!
//! Recomputes catalog prices from one base price and one configuration
//! snapshot.
//!
//! ## Batch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Repricing Run                                    │
//! │                                                                         │
//! │  run(feed)                                                             │
//! │    │                                                                    │
//! │    ├── resolve_live ── error ──► report { success: false }             │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  reprice(base_price, products)                                         │
//! │    │                                                                    │
//! │    └── for each chunk of batch_size:                                   │
//! │          for each product:                                             │
//! │            gold ──► weight ok? ──► markup ──► 0? ──► Skipped(Unpriced) │
//! │                                          │                              │
//! │                                          └──► compute_price ──► Gold   │
//! │            diamond ──► compute_diamond_price ──► Diamond               │
//! │            silver ──► Skipped(ManualPricing)                           │
//! │            any error ──► Failed(message), continue                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One bad product never aborts the batch. A failed live fetch does abort the
//! run: repricing the whole catalog at a stale price is worse than not
//! repricing it.

use aurum_core::markup::resolve_markup;
use aurum_core::pricing::{compute_diamond_price, compute_price};
use aurum_core::validation::{validate_base_price, validate_weight};
use aurum_core::{
    JewelleryType, PriceQuote, PricingKind, PricingPolicy, Purity, SilverPurity, ValidationError,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::PricingConfig;
use crate::error::ServiceResult;
use crate::price_source::{BasePriceResolver, PriceFeed, PriceOrigin};

// =============================================================================
// Catalog Input
// =============================================================================

/// One catalog product as stored by the catalog collaborator.
///
/// Codes are kept as strings so that one malformed product is reported as a
/// per-item failure instead of failing the whole catalog decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Catalog category code, e.g. `gold_bars`.
    pub jewellery_type: String,

    /// Purity code, e.g. `21K`. Required for gold; `999.0` or `999.9` when
    /// given for silver.
    #[serde(default)]
    pub purity: Option<String>,

    /// Weight in grams. Required for gold.
    #[serde(default)]
    pub weight_g: Option<Decimal>,

    /// USD ticket price. Required for diamonds.
    #[serde(default)]
    pub diamond_usd_price: Option<Decimal>,
}

// =============================================================================
// Outcomes
// =============================================================================

/// Why a product was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No markup configured for the product's category or tier.
    Unpriced,
    /// The category is priced by hand.
    ManualPricing,
}

/// What happened to one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// New gold prices to store.
    Gold { quote: PriceQuote },
    /// New diamond list price to store.
    Diamond { list_price: Decimal },
    Skipped { reason: SkipReason },
    Failed { error: String },
}

impl ItemOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, ItemOutcome::Gold { .. } | ItemOutcome::Diamond { .. })
    }
}

/// One product's outcome in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    pub product_id: String,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// Summary of one repricing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepriceReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub success: bool,
    pub message: String,
    pub base_price: Option<Decimal>,
    pub price_origin: Option<PriceOrigin>,
    pub chunks: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub items: Vec<ItemResult>,
}

impl RepriceReport {
    fn aborted(run_id: Uuid, started_at: DateTime<Utc>, message: String) -> Self {
        RepriceReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            success: false,
            message,
            base_price: None,
            price_origin: None,
            chunks: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            items: Vec::new(),
        }
    }
}

// =============================================================================
// Repricer
// =============================================================================

/// Reprices catalog products against a configuration snapshot.
#[derive(Debug, Clone)]
pub struct Repricer {
    config: PricingConfig,
    policy: PricingPolicy,
}

impl Repricer {
    /// Takes a snapshot of `config`. Fails if the config does not validate.
    pub fn new(config: PricingConfig) -> ServiceResult<Self> {
        config.validate()?;
        let policy = config.pricing_policy()?;
        Ok(Repricer { config, policy })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Fetches the live base price and reprices `products` with it.
    ///
    /// A failed fetch yields a report with `success = false` and no item
    /// results.
    pub fn run<F: PriceFeed + ?Sized>(&self, feed: &F, products: &[ProductSpec]) -> RepriceReport {
        info!(products = products.len(), "Starting price update");

        let resolver = BasePriceResolver::from_config(&self.config);
        match resolver.resolve_live(feed) {
            Ok(base_price) => {
                let mut report = self.reprice(base_price, products);
                report.price_origin = Some(PriceOrigin::Live);
                report
            }
            Err(e) => {
                error!(error = %e, "Price update aborted");
                RepriceReport::aborted(Uuid::new_v4(), Utc::now(), format!("Update failed: {e}"))
            }
        }
    }

    /// Reprices `products` at `base_price`, chunk by chunk.
    pub fn reprice(&self, base_price: Decimal, products: &[ProductSpec]) -> RepriceReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        if let Err(e) = validate_base_price(base_price) {
            error!(run_id = %run_id, error = %e, "Refusing to reprice");
            return RepriceReport::aborted(run_id, started_at, format!("Update failed: {e}"));
        }

        let mut items = Vec::with_capacity(products.len());
        let (mut updated, mut skipped, mut failed) = (0, 0, 0);
        let mut chunks = 0;

        for chunk in products.chunks(self.config.batch.batch_size) {
            chunks += 1;
            for product in chunk {
                let outcome = match self.price_item(base_price, product) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!(product_id = %product.id, error = %e, "Product not repriced");
                        ItemOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                };

                match &outcome {
                    ItemOutcome::Gold { .. } | ItemOutcome::Diamond { .. } => updated += 1,
                    ItemOutcome::Skipped { .. } => skipped += 1,
                    ItemOutcome::Failed { .. } => failed += 1,
                }

                items.push(ItemResult {
                    product_id: product.id.clone(),
                    outcome,
                });
            }

            info!(
                run_id = %run_id,
                chunk = chunks,
                size = chunk.len(),
                total_updated = updated,
                "Repriced batch"
            );
        }

        info!(
            run_id = %run_id,
            %base_price,
            updated,
            skipped,
            failed,
            "Price update completed"
        );

        let message = if products.is_empty() {
            "No products found".to_string()
        } else {
            format!("Updated {updated} products ({skipped} skipped, {failed} failed)")
        };

        RepriceReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            success: true,
            message,
            base_price: Some(base_price),
            price_origin: None,
            chunks,
            updated,
            skipped,
            failed,
            items,
        }
    }

    /// Prices one product.
    pub fn price_item(
        &self,
        base_price: Decimal,
        product: &ProductSpec,
    ) -> ServiceResult<ItemOutcome> {
        let jewellery_type: JewelleryType = product.jewellery_type.parse()?;

        match jewellery_type.pricing_kind() {
            PricingKind::Gold(gold_type) => {
                let purity: Purity = product
                    .purity
                    .as_deref()
                    .ok_or_else(|| required("Purity"))?
                    .parse()?;
                let weight_g = product.weight_g.ok_or_else(|| required("Weight"))?;
                validate_weight(weight_g)?;

                let markup = resolve_markup(&self.config, gold_type, Some(weight_g));
                if markup.is_zero() {
                    return Ok(ItemOutcome::Skipped {
                        reason: SkipReason::Unpriced,
                    });
                }

                let quote = compute_price(base_price, purity, weight_g, markup, &self.policy)?;
                Ok(ItemOutcome::Gold { quote })
            }
            PricingKind::Diamond => {
                let usd_price = product
                    .diamond_usd_price
                    .ok_or_else(|| required("Diamond USD price"))?;
                let list_price = compute_diamond_price(
                    usd_price,
                    self.config.diamond.usd_rate,
                    self.config.diamond.effective_discount(),
                )?;
                Ok(ItemOutcome::Diamond { list_price })
            }
            PricingKind::Manual => {
                if let Some(code) = product.purity.as_deref() {
                    code.parse::<SilverPurity>()?;
                }
                Ok(ItemOutcome::Skipped {
                    reason: SkipReason::ManualPricing,
                })
            }
        }
    }
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}
