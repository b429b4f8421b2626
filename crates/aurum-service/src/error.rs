//! # Service Error Types
//!
//! Error types for configuration, price resolution, repricing and order checks.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Service Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Price Feed    │  │     Orders              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  FeedUnavailable│  │  OrderRejected          │ │
//! │  │  ConfigLoad     │  │  Core(Parse)    │  │  (line + violations)    │ │
//! │  │  ConfigSave     │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Core           │  │  Serialization  │                              │
//! │  │                 │  │                 │                              │
//! │  │  InvalidInput   │  │  catalog/report │                              │
//! │  │  Parse          │  │  JSON           │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use aurum_core::{CoreError, ParseFailure, PolicyViolation, ValidationError};
use thiserror::Error;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error covering everything above the pure engine.
#[derive(Debug, Error)]
pub enum ServiceError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values are out of range.
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Price Feed Errors
    // =========================================================================
    /// The external price source could not deliver a page.
    #[error("Price feed unavailable: {0}")]
    FeedUnavailable(String),

    // =========================================================================
    // Engine Errors
    // =========================================================================
    /// Error raised by the pricing engine.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Order Errors
    // =========================================================================
    /// An order line broke the pricing policy; the whole order is rejected.
    #[error("Order rejected at line {line}: {}", join_violations(.violations))]
    OrderRejected {
        line: usize,
        violations: Vec<PolicyViolation>,
    },

    // =========================================================================
    // Serialization Errors
    // =========================================================================
    /// JSON encode/decode failed.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

fn join_violations(violations: &[PolicyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::InvalidInput(err))
    }
}

impl From<ParseFailure> for ServiceError {
    fn from(err: ParseFailure) -> Self {
        ServiceError::Core(CoreError::Parse(err))
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ServiceError {
    fn from(err: toml::de::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ServiceError {
    fn from(err: toml::ser::Error) -> Self {
        ServiceError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ServiceError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidConfig(_)
                | ServiceError::ConfigLoadFailed(_)
                | ServiceError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the error concerns a single catalog item, so a batch
    /// should record it and move on.
    pub fn is_item_error(&self) -> bool {
        matches!(self, ServiceError::Core(core) if core.is_item_error())
    }
}
