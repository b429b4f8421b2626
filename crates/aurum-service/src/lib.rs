//! # aurum-service: Pricing Services for Aurum POS
//!
//! Everything around the pure engine that touches the outside world:
//! configuration files, the price page, the catalog and orders.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Service Architecture                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 PricingConfig (config snapshot)                  │  │
//! │  │   TOML file + AURUM_* env overrides, validated on load           │  │
//! │  │   implements aurum_core::MarkupSource                            │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ PriceResolver  │  │   Repricer     │  │     OrderGuard         │    │
//! │  │                │  │                │  │                        │    │
//! │  │ PriceFeed page │  │ Chunked batch  │  │ Line entry check       │    │
//! │  │ → extract      │  │ per-item       │  │ Finalization check     │    │
//! │  │ → fallback     │  │ failure        │  │ (first bad line        │    │
//! │  │                │  │ isolation      │  │  rejects the order)    │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - `PricingConfig` loading, validation and overrides
//! - [`price_source`] - `PriceFeed` trait and base price resolution
//! - [`repricer`] - Batch catalog repricing and reports
//! - [`order`] - Order-line policy checkpoints
//! - [`error`] - Service error types

pub mod config;
pub mod error;
pub mod order;
pub mod price_source;
pub mod repricer;

pub use config::PricingConfig;
pub use error::{ServiceError, ServiceResult};
pub use order::{LineCheck, OrderGuard, OrderLine};
pub use price_source::{BasePriceResolver, FilePriceFeed, PriceFeed, PriceOrigin, ResolvedPrice};
pub use repricer::{ItemOutcome, ProductSpec, RepriceReport, Repricer, SkipReason};
