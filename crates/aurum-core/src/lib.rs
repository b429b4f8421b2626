//! # aurum-core: Pure Pricing Logic for Aurum POS
//!
//! This crate computes jewellery prices from a base commodity price, the
//! item's purity and weight, and a configured markup. It has zero I/O
//! dependencies: fetching prices, reading config and writing products all
//! live in `aurum-service`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Aurum POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    aurum-repricer (CLI)                         │   │
//! │  │    load config ──► fetch page ──► reprice catalog ──► report    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    aurum-service                                │   │
//! │  │    PricingConfig, BasePriceResolver, Repricer, OrderGuard       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ aurum-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐       │   │
//! │  │   │  types   │  │  markup  │  │ pricing  │  │  policy  │       │   │
//! │  │   │  Purity  │  │  tiers   │  │  quote   │  │  min /   │       │   │
//! │  │   │  Quote   │  │  lookup  │  │  diamond │  │ discount │       │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘       │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐                     │   │
//! │  │   │  money   │  │ extract  │  │validation│                     │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘                     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GLOBAL STATE • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Purity, jewellery categories, quotes, pricing policy
//! - [`money`] - Decimal rounding helpers (2 dp, half away from zero)
//! - [`markup`] - Markup lookup, weight-tiered bar markups
//! - [`pricing`] - The price formula and diamond conversion
//! - [`extract`] - Base price extraction from fetched text
//! - [`policy`] - Minimum price and discount ceiling for order lines
//! - [`validation`] - Input range checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Decimal Money**: every amount is a `rust_decimal::Decimal`, never a float
//! 2. **Explicit Policy**: retention and rounding are passed in, not read from globals
//! 3. **Zero Means Unpriced**: missing markup config resolves to zero, not an error
//! 4. **Explicit Errors**: all failures are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use aurum_core::markup::resolve_markup;
//! use aurum_core::pricing::compute_price;
//! use aurum_core::{GoldType, PricingPolicy, Purity};
//! use rust_decimal::Decimal;
//!
//! let mut config = HashMap::new();
//! config.insert("jewellery_local".to_string(), "100".to_string());
//!
//! let markup = resolve_markup(&config, GoldType::JewelleryLocal, None);
//! let quote = compute_price(
//!     Decimal::from(1000),
//!     Purity::K21,
//!     Decimal::from(1),
//!     markup,
//!     &PricingPolicy::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(quote.sale_price, Decimal::from(1100));
//! assert_eq!(quote.min_sale_price, Decimal::from(1050));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod extract;
pub mod markup;
pub mod money;
pub mod policy;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ParseFailure, ValidationError};
pub use markup::{MarkupSource, MarkupTier};
pub use policy::{LinePolicy, LineProposal, PolicyViolation};
pub use types::*;

use rust_decimal::Decimal;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Heaviest single item the engine will price, in grams.
///
/// ## Business Reason
/// Catches unit mistakes (kilograms typed as grams) before they reach a
/// price tag. The heaviest stocked bar is 1 kg.
pub const MAX_WEIGHT_G: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);
