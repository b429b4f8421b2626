//! # Base Price Resolution
//!
//! Turns a fetched page into a base price, or falls back to the caller-owned
//! last known price.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Base Price Resolution                              │
//! │                                                                         │
//! │  pattern configured? ──── no ────────────┐                             │
//! │        │ yes                              │                             │
//! │        ▼                                  │                             │
//! │  PriceFeed::fetch_page() ── error ───────┤                             │
//! │        │ text                             │                             │
//! │        ▼                                  ▼                             │
//! │  extract_price() ── ParseFailure ──► resolve():      fallback price    │
//! │        │                             resolve_live(): error returned    │
//! │        ▼                                                                │
//! │  price, source = Live                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resolver never caches. After a live success the caller decides whether
//! to store the price as the next fallback, see
//! [`PricingConfig::persist_fallback_price`](crate::PricingConfig::persist_fallback_price).

use std::path::PathBuf;

use aurum_core::extract::{compile_pattern, extract_price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::PricingConfig;
use crate::error::{ServiceError, ServiceResult};

// =============================================================================
// Price Feed
// =============================================================================

/// The external collaborator that delivers the raw price page.
pub trait PriceFeed {
    /// Returns the page text, or [`ServiceError::FeedUnavailable`].
    fn fetch_page(&self) -> ServiceResult<String>;
}

impl<F: PriceFeed + ?Sized> PriceFeed for &F {
    fn fetch_page(&self) -> ServiceResult<String> {
        (**self).fetch_page()
    }
}

/// Reads the price page from a file saved by an external fetcher.
#[derive(Debug, Clone)]
pub struct FilePriceFeed {
    path: PathBuf,
}

impl FilePriceFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FilePriceFeed { path: path.into() }
    }
}

impl PriceFeed for FilePriceFeed {
    fn fetch_page(&self) -> ServiceResult<String> {
        std::fs::read_to_string(&self.path).map_err(|e| {
            ServiceError::FeedUnavailable(format!("{}: {}", self.path.display(), e))
        })
    }
}

// =============================================================================
// Resolved Price
// =============================================================================

/// Where a base price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceOrigin {
    /// Extracted from a freshly fetched page.
    Live,
    /// The caller-supplied last known price.
    Fallback,
}

/// A base price together with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    pub price: Decimal,
    pub source: PriceOrigin,
}

impl ResolvedPrice {
    pub fn is_live(&self) -> bool {
        self.source == PriceOrigin::Live
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves the base price per gram of the reference purity.
#[derive(Debug, Clone, PartialEq)]
pub struct BasePriceResolver {
    pattern: String,
    fallback_price: Decimal,
}

impl BasePriceResolver {
    pub fn new(pattern: impl Into<String>, fallback_price: Decimal) -> Self {
        BasePriceResolver {
            pattern: pattern.into(),
            fallback_price,
        }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(
            config.price_source.pattern.clone(),
            config.price_source.fallback_price,
        )
    }

    /// Fetches and extracts the live price. Any failure is returned.
    pub fn resolve_live<F: PriceFeed + ?Sized>(&self, feed: &F) -> ServiceResult<Decimal> {
        compile_pattern(&self.pattern)?;

        let text = feed.fetch_page()?;
        let price = extract_price(&text, &self.pattern)?;

        info!(%price, "Live base price fetched");
        Ok(price)
    }

    /// Fetches the live price, falling back to the last known price on any
    /// feed or extraction failure.
    pub fn resolve<F: PriceFeed + ?Sized>(&self, feed: &F) -> ResolvedPrice {
        match self.resolve_live(feed) {
            Ok(price) => ResolvedPrice {
                price,
                source: PriceOrigin::Live,
            },
            Err(e) => {
                error!(error = %e, "Failed to fetch live base price");
                warn!(fallback = %self.fallback_price, "Using fallback base price");
                ResolvedPrice {
                    price: self.fallback_price,
                    source: PriceOrigin::Fallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurum_core::{CoreError, ParseFailure};
    use rust_decimal_macros::dec;
    use std::cell::Cell;

    const PAGE: &str = "علما بأن سعر البيع لجرام الذهب عيار 21 هو 5415 جنيها";

    struct StaticFeed {
        page: Option<&'static str>,
        calls: Cell<usize>,
    }

    impl StaticFeed {
        fn ok(page: &'static str) -> Self {
            StaticFeed {
                page: Some(page),
                calls: Cell::new(0),
            }
        }

        fn down() -> Self {
            StaticFeed {
                page: None,
                calls: Cell::new(0),
            }
        }
    }

    impl PriceFeed for StaticFeed {
        fn fetch_page(&self) -> ServiceResult<String> {
            self.calls.set(self.calls.get() + 1);
            self.page
                .map(str::to_string)
                .ok_or_else(|| ServiceError::FeedUnavailable("timed out".into()))
        }
    }

    #[test]
    fn test_live_price() {
        let resolver = BasePriceResolver::new(r"هو (\d+)", dec!(75));
        let resolved = resolver.resolve(&StaticFeed::ok(PAGE));
        assert_eq!(resolved.price, dec!(5415));
        assert!(resolved.is_live());
    }

    #[test]
    fn test_fallback_when_feed_down() {
        let resolver = BasePriceResolver::new(r"هو (\d+)", dec!(5400));
        let resolved = resolver.resolve(&StaticFeed::down());
        assert_eq!(
            resolved,
            ResolvedPrice {
                price: dec!(5400),
                source: PriceOrigin::Fallback
            }
        );
    }

    #[test]
    fn test_fallback_when_page_changed() {
        let resolver = BasePriceResolver::new(r"هو (\d+)", dec!(75));
        let resolved = resolver.resolve(&StaticFeed::ok("maintenance"));
        assert_eq!(resolved.source, PriceOrigin::Fallback);
        assert_eq!(resolved.price, dec!(75));
    }

    #[test]
    fn test_resolve_live_reports_failure() {
        let resolver = BasePriceResolver::new(r"هو (\d+)", dec!(75));

        let err = resolver.resolve_live(&StaticFeed::down()).unwrap_err();
        assert!(matches!(err, ServiceError::FeedUnavailable(_)));

        let err = resolver.resolve_live(&StaticFeed::ok("maintenance")).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Parse(ParseFailure::NoMatch))
        ));
    }

    #[test]
    fn test_unconfigured_pattern_skips_fetch() {
        let resolver = BasePriceResolver::new("", dec!(75));
        let feed = StaticFeed::ok(PAGE);

        let err = resolver.resolve_live(&feed).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Parse(ParseFailure::EmptyPattern))
        ));
        assert_eq!(feed.calls.get(), 0);
    }

    #[test]
    fn test_from_config() {
        let mut config = PricingConfig::default();
        config.price_source.pattern = r"هو (\d+)".to_string();
        let resolver = BasePriceResolver::from_config(&config);
        assert_eq!(resolver.resolve(&StaticFeed::down()).price, dec!(75));
    }

    #[test]
    fn test_file_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, PAGE).unwrap();

        let resolver = BasePriceResolver::new(r"هو (\d+)", dec!(75));
        assert_eq!(
            resolver.resolve_live(&FilePriceFeed::new(&path)).unwrap(),
            dec!(5415)
        );

        let missing = FilePriceFeed::new(dir.path().join("missing.html"));
        assert!(matches!(
            missing.fetch_page(),
            Err(ServiceError::FeedUnavailable(_))
        ));
    }
}
