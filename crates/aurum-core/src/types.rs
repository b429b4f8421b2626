//! # Domain Types
//!
//! Core value types used throughout the pricing engine.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  JewelleryType  │   │    GoldType     │   │     Purity      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  GoldLocal    ──┼──►│  JewelleryLocal │   │  24K  = 8/7     │       │
//! │  │  GoldForeign  ──┼──►│  JewelleryForgn │   │  21K  = 1       │       │
//! │  │  GoldBars     ──┼──►│  Bars (tiered)  │   │  18K  = 7/8     │       │
//! │  │  Diamond        │   └─────────────────┘   │  14K  = 2/3     │       │
//! │  │  Silver         │                         │  10K  = 10/21   │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   PriceQuote    │   │  PricingPolicy  │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  cost_price     │   │  retention (K)  │                             │
//! │  │  sale_price     │   │  coarse_rounding│                             │
//! │  │  min_sale_price │   └─────────────────┘                             │
//! │  │  markup_total   │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Category dispatch is a closed enum matched exhaustively. Unknown codes are
//! rejected when parsed, never defaulted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money;
use crate::validation::{validate_denomination, validate_retention};

// =============================================================================
// Purity
// =============================================================================

/// Gold fineness, quoted in karats.
///
/// The live board quotes 21K; every other purity is priced through an exact
/// ratio relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Purity {
    #[serde(rename = "24K")]
    K24,
    #[serde(rename = "21K")]
    K21,
    #[serde(rename = "18K")]
    K18,
    #[serde(rename = "14K")]
    K14,
    #[serde(rename = "10K")]
    K10,
}

/// The purity the base price is quoted in.
pub const REFERENCE_PURITY: Purity = Purity::K21;

/// A purity multiplier kept as an exact fraction.
///
/// `8/7` is stored as two integers and only divided at the moment it is
/// applied, so the ratio itself never carries rounding error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurityRatio {
    pub numerator: u32,
    pub denominator: u32,
}

impl PurityRatio {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        PurityRatio {
            numerator,
            denominator,
        }
    }

    /// Returns true if the ratio is strictly positive.
    pub const fn is_positive(&self) -> bool {
        self.numerator > 0 && self.denominator > 0
    }

    /// Multiplies `value` by this ratio: `value × numerator / denominator`.
    ///
    /// Returns `None` when the product does not fit in a decimal.
    pub fn apply(&self, value: Decimal) -> Option<Decimal> {
        value
            .checked_mul(Decimal::from(self.numerator))?
            .checked_div(Decimal::from(self.denominator))
    }
}

impl Purity {
    /// All supported purities, highest first.
    pub const ALL: [Purity; 5] = [
        Purity::K24,
        Purity::K21,
        Purity::K18,
        Purity::K14,
        Purity::K10,
    ];

    /// Ratio of this purity's price to the 21K reference price.
    pub const fn ratio(&self) -> PurityRatio {
        match self {
            Purity::K24 => PurityRatio::new(8, 7),
            Purity::K21 => PurityRatio::new(1, 1),
            Purity::K18 => PurityRatio::new(7, 8),
            Purity::K14 => PurityRatio::new(2, 3),
            Purity::K10 => PurityRatio::new(10, 21),
        }
    }

    /// Nominal millesimal fineness (parts per thousand), for display.
    pub const fn fineness(&self) -> u32 {
        match self {
            Purity::K24 => 999,
            Purity::K21 => 875,
            Purity::K18 => 750,
            Purity::K14 => 583,
            Purity::K10 => 417,
        }
    }

    /// The code used by catalogs and config, e.g. `"21K"`.
    pub const fn code(&self) -> &'static str {
        match self {
            Purity::K24 => "24K",
            Purity::K21 => "21K",
            Purity::K18 => "18K",
            Purity::K14 => "14K",
            Purity::K10 => "10K",
        }
    }
}

impl fmt::Display for Purity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Purity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "24K" => Ok(Purity::K24),
            "21K" => Ok(Purity::K21),
            "18K" => Ok(Purity::K18),
            "14K" => Ok(Purity::K14),
            "10K" => Ok(Purity::K10),
            _ => Err(ValidationError::UnsupportedPurity(s.to_string())),
        }
    }
}

// =============================================================================
// Silver Purity
// =============================================================================

/// Silver fineness. Recorded on silver items; silver is not auto-priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SilverPurity {
    #[serde(rename = "999.0")]
    Fine999_0,
    #[serde(rename = "999.9")]
    Fine999_9,
}

impl FromStr for SilverPurity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "999.0" | "999" => Ok(SilverPurity::Fine999_0),
            "999.9" => Ok(SilverPurity::Fine999_9),
            _ => Err(ValidationError::UnsupportedPurity(s.to_string())),
        }
    }
}

// =============================================================================
// Gold Type
// =============================================================================

/// The markup category of a gold item.
///
/// ## Markup Shape
/// - `JewelleryLocal`, `JewelleryForeign`: one scalar markup per gram
/// - `Bars`: markup per gram depends on the bar's weight tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum GoldType {
    JewelleryLocal,
    JewelleryForeign,
    #[serde(alias = "ingots", alias = "coins")]
    Bars,
}

impl GoldType {
    /// Config/catalog code, e.g. `"jewellery_local"`.
    pub const fn code(&self) -> &'static str {
        match self {
            GoldType::JewelleryLocal => "jewellery_local",
            GoldType::JewelleryForeign => "jewellery_foreign",
            GoldType::Bars => "bars",
        }
    }

    /// Returns true if markup depends on weight.
    pub const fn is_tiered(&self) -> bool {
        matches!(self, GoldType::Bars)
    }
}

impl fmt::Display for GoldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for GoldType {
    type Err = ValidationError;

    /// Parses a gold type code.
    ///
    /// The retired `ingots` and `coins` codes were folded into `bars` and
    /// still parse as [`GoldType::Bars`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jewellery_local" => Ok(GoldType::JewelleryLocal),
            "jewellery_foreign" => Ok(GoldType::JewelleryForeign),
            "bars" | "ingots" | "coins" => Ok(GoldType::Bars),
            _ => Err(ValidationError::UnsupportedCategory(s.to_string())),
        }
    }
}

// =============================================================================
// Jewellery Type
// =============================================================================

/// The catalog category of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum JewelleryType {
    GoldLocal,
    GoldForeign,
    GoldBars,
    DiamondJewellery,
    Silver,
}

/// How an item of a given category gets its price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingKind {
    /// Commodity price × purity × weight plus markup.
    Gold(GoldType),
    /// USD ticket price × exchange rate, less the global diamond discount.
    Diamond,
    /// Priced by hand.
    Manual,
}

impl JewelleryType {
    /// Catalog code, e.g. `"gold_bars"`.
    pub const fn code(&self) -> &'static str {
        match self {
            JewelleryType::GoldLocal => "gold_local",
            JewelleryType::GoldForeign => "gold_foreign",
            JewelleryType::GoldBars => "gold_bars",
            JewelleryType::DiamondJewellery => "diamond_jewellery",
            JewelleryType::Silver => "silver",
        }
    }

    /// Maps the category to its pricing rule.
    pub const fn pricing_kind(&self) -> PricingKind {
        match self {
            JewelleryType::GoldLocal => PricingKind::Gold(GoldType::JewelleryLocal),
            JewelleryType::GoldForeign => PricingKind::Gold(GoldType::JewelleryForeign),
            JewelleryType::GoldBars => PricingKind::Gold(GoldType::Bars),
            JewelleryType::DiamondJewellery => PricingKind::Diamond,
            JewelleryType::Silver => PricingKind::Manual,
        }
    }

    /// The gold markup category, if this is a gold item.
    pub const fn gold_type(&self) -> Option<GoldType> {
        match self.pricing_kind() {
            PricingKind::Gold(gold_type) => Some(gold_type),
            PricingKind::Diamond | PricingKind::Manual => None,
        }
    }
}

impl From<GoldType> for JewelleryType {
    fn from(gold_type: GoldType) -> Self {
        match gold_type {
            GoldType::JewelleryLocal => JewelleryType::GoldLocal,
            GoldType::JewelleryForeign => JewelleryType::GoldForeign,
            GoldType::Bars => JewelleryType::GoldBars,
        }
    }
}

impl fmt::Display for JewelleryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for JewelleryType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gold_local" => Ok(JewelleryType::GoldLocal),
            "gold_foreign" => Ok(JewelleryType::GoldForeign),
            "gold_bars" => Ok(JewelleryType::GoldBars),
            "diamond_jewellery" => Ok(JewelleryType::DiamondJewellery),
            "silver" => Ok(JewelleryType::Silver),
            _ => Err(ValidationError::UnsupportedCategory(s.to_string())),
        }
    }
}

// =============================================================================
// Price Quote
// =============================================================================

/// The result of one price computation.
///
/// ## Invariant
/// `cost_price ≤ min_sale_price ≤ sale_price` whenever markup ≥ 0 and no
/// coarse rounding is applied. Coarse rounding keeps
/// `min_sale_price ≤ sale_price` but may round either below cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceQuote {
    /// Metal value: adjusted base price × weight.
    #[ts(as = "String")]
    pub cost_price: Decimal,

    /// List price: cost plus full markup.
    #[ts(as = "String")]
    pub sale_price: Decimal,

    /// Floor price: cost plus the retained share of markup.
    #[ts(as = "String")]
    pub min_sale_price: Decimal,

    /// Markup per gram × weight.
    #[ts(as = "String")]
    pub markup_total: Decimal,
}

impl PriceQuote {
    /// Returns `(cost, sale, min_sale)` as floats for callers that store floats.
    pub fn as_f64(&self) -> (f64, f64, f64) {
        (
            money::to_f64(self.cost_price),
            money::to_f64(self.sale_price),
            money::to_f64(self.min_sale_price),
        )
    }

    /// Checks `cost ≤ min_sale ≤ sale`.
    pub fn is_ordered(&self) -> bool {
        self.cost_price <= self.min_sale_price && self.min_sale_price <= self.sale_price
    }

    /// A quote with no markup means "not priced yet" to catalog callers.
    pub fn is_unpriced(&self) -> bool {
        self.markup_total.is_zero()
    }
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// Default share of markup that the minimum sale price must keep.
pub const DEFAULT_RETENTION: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// The policy constants shared by the price formula and the line enforcer.
///
/// ## Fields
/// - `retention` (K): share of markup kept in the minimum sale price, and the
///   share of markup that caps the discount.
/// - `coarse_rounding`: optional denomination that sale and minimum prices are
///   rounded to after the cent rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricingPolicy {
    retention: Decimal,
    coarse_rounding: Option<Decimal>,
}

impl PricingPolicy {
    /// Builds a validated policy.
    ///
    /// `retention` must be within `[0, 1]`; a denomination, when given, must be
    /// positive.
    pub fn new(
        retention: Decimal,
        coarse_rounding: Option<Decimal>,
    ) -> Result<Self, ValidationError> {
        validate_retention(retention)?;
        if let Some(denomination) = coarse_rounding {
            validate_denomination(denomination)?;
        }
        Ok(PricingPolicy {
            retention,
            coarse_rounding,
        })
    }

    /// Retention fraction K.
    #[inline]
    pub fn retention(&self) -> Decimal {
        self.retention
    }

    /// Coarse rounding denomination, if enabled.
    #[inline]
    pub fn coarse_rounding(&self) -> Option<Decimal> {
        self.coarse_rounding
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            retention: DEFAULT_RETENTION,
            coarse_rounding: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
