//! # Markup Resolver
//!
//! Resolves the markup per gram for a gold category from a configuration
//! snapshot.
//!
//! ## Resolution Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      resolve_markup(category, weight)                   │
//! │                                                                         │
//! │  jewellery_local / jewellery_foreign                                   │
//! │  └── read "<category>" → parse → value (or 0)                          │
//! │                                                                         │
//! │  bars (tiered by weight)                                               │
//! │  ├── weight missing or ≤ 0   → 0                                       │
//! │  ├── weight ≥ 1000 g         → "bars_1000g"                            │
//! │  └── otherwise closest tier below 1000 g, lower tier wins ties         │
//! │                                                                         │
//! │      1   2.5   5   10   20   31   50   100   250   500 │ 1000+         │
//! │                ▲ 7.5 g is 2.5 from both → 5 g wins     │               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Missing Configuration
//! An absent, unparsable or negative value resolves to `0`. That is the
//! "not priced yet" state, not an error: the caller decides whether a
//! zero-markup item may be priced.

use std::collections::HashMap;
use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::GoldType;

// =============================================================================
// Configuration Source
// =============================================================================

/// Read access to the key-value configuration store holding markups.
///
/// Keys are bare names such as `jewellery_local` or `bars_2_5g`. Values are
/// returned raw; the resolver does the lenient parsing.
pub trait MarkupSource {
    /// Returns the raw configured value for `key`, if any.
    fn markup_param(&self, key: &str) -> Option<String>;
}

impl MarkupSource for HashMap<String, String> {
    fn markup_param(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl MarkupSource for BTreeMap<String, String> {
    fn markup_param(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: MarkupSource + ?Sized> MarkupSource for &T {
    fn markup_param(&self, key: &str) -> Option<String> {
        (**self).markup_param(key)
    }
}

// =============================================================================
// Bar Tiers
// =============================================================================

/// One weight breakpoint of the bar markup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupTier {
    pub weight_threshold_g: Decimal,
    pub markup_per_gram: Decimal,
}

/// Bars at or above this weight use the top tier.
pub const TOP_TIER_THRESHOLD_G: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Bar tier thresholds in grams with their config keys, ascending.
///
/// The last entry is the 1000 g+ tier.
pub const BAR_TIERS: [(Decimal, &str); 11] = [
    (Decimal::from_parts(1, 0, 0, false, 0), "bars_1g"),
    (Decimal::from_parts(25, 0, 0, false, 1), "bars_2_5g"),
    (Decimal::from_parts(5, 0, 0, false, 0), "bars_5g"),
    (Decimal::from_parts(10, 0, 0, false, 0), "bars_10g"),
    (Decimal::from_parts(20, 0, 0, false, 0), "bars_20g"),
    (Decimal::from_parts(31, 0, 0, false, 0), "bars_31g"),
    (Decimal::from_parts(50, 0, 0, false, 0), "bars_50g"),
    (Decimal::from_parts(100, 0, 0, false, 0), "bars_100g"),
    (Decimal::from_parts(250, 0, 0, false, 0), "bars_250g"),
    (Decimal::from_parts(500, 0, 0, false, 0), "bars_500g"),
    (TOP_TIER_THRESHOLD_G, "bars_1000g"),
];

/// Reads the full bar tier table from `source`, ascending by threshold.
///
/// Unconfigured tiers carry a markup of zero.
pub fn bar_tiers<S: MarkupSource + ?Sized>(source: &S) -> Vec<MarkupTier> {
    BAR_TIERS
        .iter()
        .map(|(threshold, key)| MarkupTier {
            weight_threshold_g: *threshold,
            markup_per_gram: read_markup(source, key),
        })
        .collect()
}

/// Picks the tier that applies to `weight_g`.
///
/// `tiers` must be sorted ascending by threshold. Returns `None` for an empty
/// table or a non-positive weight.
pub fn select_tier(tiers: &[MarkupTier], weight_g: Decimal) -> Option<MarkupTier> {
    if weight_g <= Decimal::ZERO {
        return None;
    }

    if weight_g >= TOP_TIER_THRESHOLD_G {
        if let Some(top) = tiers
            .iter()
            .rev()
            .find(|tier| tier.weight_threshold_g >= TOP_TIER_THRESHOLD_G)
        {
            return Some(*top);
        }
    }

    // Ascending scan with a strict comparison keeps the lower threshold on ties.
    let mut best: Option<(Decimal, MarkupTier)> = None;
    for tier in tiers
        .iter()
        .filter(|tier| tier.weight_threshold_g < TOP_TIER_THRESHOLD_G)
    {
        let distance = (tier.weight_threshold_g - weight_g).abs();
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, *tier)),
        }
    }
    best.map(|(_, tier)| tier)
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolves the markup per gram for `gold_type`.
///
/// `weight_g` is only consulted for tiered categories. The result is always
/// `≥ 0`.
///
/// ## Example
/// ```rust
/// use std::collections::HashMap;
/// use aurum_core::markup::resolve_markup;
/// use aurum_core::GoldType;
/// use rust_decimal::Decimal;
///
/// let mut config = HashMap::new();
/// config.insert("bars_5g".to_string(), "125".to_string());
/// config.insert("bars_10g".to_string(), "120".to_string());
///
/// let weight = Decimal::new(75, 1); // 7.5 g, halfway between 5 and 10
/// let markup = resolve_markup(&config, GoldType::Bars, Some(weight));
/// assert_eq!(markup, Decimal::from(125));
/// ```
pub fn resolve_markup<S: MarkupSource + ?Sized>(
    source: &S,
    gold_type: GoldType,
    weight_g: Option<Decimal>,
) -> Decimal {
    match gold_type {
        GoldType::JewelleryLocal | GoldType::JewelleryForeign => {
            read_markup(source, gold_type.code())
        }
        GoldType::Bars => {
            let Some(weight_g) = weight_g else {
                return Decimal::ZERO;
            };
            select_tier(&bar_tiers(source), weight_g)
                .map(|tier| tier.markup_per_gram)
                .unwrap_or(Decimal::ZERO)
        }
    }
}

/// Reads one markup value, degrading anything unusable to zero.
fn read_markup<S: MarkupSource + ?Sized>(source: &S, key: &str) -> Decimal {
    source
        .markup_param(key)
        .and_then(|raw| parse_markup(&raw))
        .unwrap_or(Decimal::ZERO)
}

/// Parses a raw config value. Accepts plain and scientific notation.
fn parse_markup(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()?;
    (value >= Decimal::ZERO).then_some(value)
}

// =============================================================================
// Unit Tests
// =============================================================================
