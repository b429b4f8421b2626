//! # Error Types
//!
//! Domain-specific error types for aurum-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  aurum-core errors (this file)                                         │
//! │  ├── CoreError        - What every core operation returns              │
//! │  ├── ValidationError  - Bad weight, price, markup, purity, category    │
//! │  └── ParseFailure     - Price text extraction failures                 │
//! │                                                                         │
//! │  aurum-service errors (separate crate)                                 │
//! │  └── ServiceError     - Config, price feed, batch failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → CLI report         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Missing Configuration Is Not An Error
//! An unconfigured markup resolves to zero (see [`crate::markup`]). Only
//! malformed *inputs* are errors; the caller decides what a zero-markup quote
//! means.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::policy::PolicyViolation;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the pricing engine.
///
/// ## Propagation
/// - `InvalidInput` / `Parse`: abort the computation for one item. Batch callers
///   record the failure and continue with the next item.
/// - `PolicyViolation`: abort the transaction the line belongs to.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A pricing input is malformed (weight, base price, markup, purity...).
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The base price could not be extracted from fetched text.
    #[error("Price extraction failed: {0}")]
    Parse(#[from] ParseFailure),

    /// A proposed order line breaks the pricing policy.
    ///
    /// ## User Workflow
    /// ```text
    /// Cashier enters 10% discount on a 90.00 line
    ///      │
    ///      ▼
    /// effective price 81.00 < minimum 85.00
    ///      │
    ///      ▼
    /// PolicyViolation { violations: [BelowMinimum { 81.00, 85.00 }] }
    ///      │
    ///      ▼
    /// Order is rejected, operator sees both numbers
    /// ```
    #[error("Order line rejected: {}", join_violations(.violations))]
    PolicyViolation { violations: Vec<PolicyViolation> },
}

fn join_violations(violations: &[PolicyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CoreError {
    /// Returns true for errors caused by the item's own inputs.
    ///
    /// Batch callers skip such items and keep going.
    pub fn is_item_error(&self) -> bool {
        matches!(self, CoreError::InvalidInput(_) | CoreError::Parse(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised immediately, never coerced into a default value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required value is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be greater than 0, got: {value}")]
    MustBePositive { field: String, value: Decimal },

    /// Value must be zero or greater.
    #[error("{field} cannot be negative, got: {value}")]
    MustNotBeNegative { field: String, value: Decimal },

    /// Value is outside its allowed range (inclusive).
    #[error("{field} must be between {min} and {max}, got: {value}")]
    OutOfRange {
        field: String,
        min: Decimal,
        max: Decimal,
        value: Decimal,
    },

    /// A computed amount does not fit in a decimal.
    #[error("{field} is too large to compute")]
    TooLarge { field: String },

    /// Purity code is not in the supported table.
    #[error("Invalid purity: {0}")]
    UnsupportedPurity(String),

    /// Category code is not a known jewellery or gold type.
    #[error("Unsupported category: {0}")]
    UnsupportedCategory(String),
}

// =============================================================================
// Parse Failure
// =============================================================================

/// Price text extraction failures.
///
/// Every sub-case is a distinct variant so the operator can tell a broken
/// pattern from a page that simply changed layout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseFailure {
    /// No pattern was configured.
    #[error("Price pattern is empty")]
    EmptyPattern,

    /// The pattern does not compile.
    #[error("Invalid price pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The pattern compiled but found nothing in the text.
    #[error("Price not found in response")]
    NoMatch,

    /// The matched text holds no usable number.
    #[error("Matched text '{matched}' is not a number")]
    NotNumeric { matched: String },

    /// The extracted number is zero or negative.
    #[error("Invalid price extracted: {value}")]
    NotPositive { value: Decimal },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "Weight".to_string(),
            value: dec!(0),
        };
        assert_eq!(err.to_string(), "Weight must be greater than 0, got: 0");

        let err = ValidationError::MustNotBeNegative {
            field: "Markup".to_string(),
            value: dec!(-5.0),
        };
        assert_eq!(err.to_string(), "Markup cannot be negative, got: -5.0");

        let err = ValidationError::UnsupportedPurity("99K".to_string());
        assert_eq!(err.to_string(), "Invalid purity: 99K");

        let err = ValidationError::TooLarge {
            field: "Markup total".to_string(),
        };
        assert_eq!(err.to_string(), "Markup total is too large to compute");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let err: CoreError = ValidationError::Required {
            field: "purity".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::InvalidInput(_)));
        assert!(err.is_item_error());
    }

    #[test]
    fn test_parse_failures_are_distinguishable() {
        assert_eq!(
            ParseFailure::NoMatch.to_string(),
            "Price not found in response"
        );
        assert_eq!(
            ParseFailure::NotNumeric {
                matched: "abc".to_string()
            }
            .to_string(),
            "Matched text 'abc' is not a number"
        );
        assert_eq!(
            ParseFailure::NotPositive { value: dec!(0) }.to_string(),
            "Invalid price extracted: 0"
        );
    }

    #[test]
    fn test_policy_violation_message_lists_every_rule() {
        let err = CoreError::PolicyViolation {
            violations: vec![
                PolicyViolation::BelowMinimum {
                    effective_price: dec!(81.00),
                    min_sale_price: dec!(85.00),
                },
                PolicyViolation::ExcessiveDiscount {
                    discount_pct: dec!(10),
                    max_discount_pct: dec!(2.38),
                },
            ],
        };
        let message = err.to_string();
        assert!(message.starts_with("Order line rejected: "));
        assert!(message.contains("81.00"));
        assert!(message.contains("85.00"));
        assert!(message.contains("2.38"));
        assert!(!err.is_item_error());
    }
}
