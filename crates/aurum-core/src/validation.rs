//! # Validation Module
//!
//! Input validation for pricing inputs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: POS line entry (interactive)                                 │
//! │  └── Immediate operator feedback, bypassable                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── weight, base price, markup, discount ranges                       │
//! │  └── policy constants (retention, rounding denomination)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Order finalization                                           │
//! │  └── Authoritative policy re-check (see crate::policy)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use aurum_core::validation::{validate_markup, validate_weight};
//! use rust_decimal::Decimal;
//!
//! assert!(validate_weight(Decimal::from(10)).is_ok());
//! assert!(validate_weight(Decimal::ZERO).is_err());
//! assert!(validate_markup(Decimal::from(-5)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::MAX_WEIGHT_G;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Pricing Inputs
// =============================================================================

/// Validates an item weight in grams.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_WEIGHT_G`]
pub fn validate_weight(weight_g: Decimal) -> ValidationResult<()> {
    if weight_g <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "Weight".to_string(),
            value: weight_g,
        });
    }

    if weight_g > MAX_WEIGHT_G {
        return Err(ValidationError::OutOfRange {
            field: "Weight".to_string(),
            min: Decimal::ZERO,
            max: MAX_WEIGHT_G,
            value: weight_g,
        });
    }

    Ok(())
}

/// Validates the base commodity price per gram.
pub fn validate_base_price(base_price: Decimal) -> ValidationResult<()> {
    if base_price <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "Base gold price".to_string(),
            value: base_price,
        });
    }

    Ok(())
}

/// Validates a markup per gram. Zero is allowed (unpriced).
pub fn validate_markup(markup_per_gram: Decimal) -> ValidationResult<()> {
    if markup_per_gram < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: "Markup".to_string(),
            value: markup_per_gram,
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
pub fn validate_discount_pct(discount_pct: Decimal) -> ValidationResult<()> {
    if discount_pct < Decimal::ZERO || discount_pct > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "Discount".to_string(),
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
            value: discount_pct,
        });
    }

    Ok(())
}

// =============================================================================
// Policy Constants
// =============================================================================

/// Validates the markup retention fraction K.
///
/// ## Rules
/// - Must be between 0 and 1 inclusive
pub fn validate_retention(retention: Decimal) -> ValidationResult<()> {
    if retention < Decimal::ZERO || retention > Decimal::ONE {
        return Err(ValidationError::OutOfRange {
            field: "Retention".to_string(),
            min: Decimal::ZERO,
            max: Decimal::ONE,
            value: retention,
        });
    }

    Ok(())
}

/// Validates a coarse rounding denomination.
pub fn validate_denomination(denomination: Decimal) -> ValidationResult<()> {
    if denomination <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "Rounding denomination".to_string(),
            value: denomination,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
