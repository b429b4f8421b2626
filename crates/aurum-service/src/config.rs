//! # Pricing Configuration
//!
//! Configuration management for the pricing services.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     AURUM_RETENTION=0.7                                                │
//! │     AURUM_MARKUP_BARS_5G=125                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/aurum-pos/pricing.toml (Linux)                           │
//! │     ~/Library/Application Support/com.aurum.pos/pricing.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     K = 0.5, no coarse rounding, fallback price 75, no markups         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pricing.toml
//! [policy]
//! retention = 0.5          # K: share of markup kept in the minimum price
//! coarse_rounding = 50     # optional; omit to disable
//!
//! [markup]
//! jewellery_local = 200
//! jewellery_foreign = "200"
//! bars_1g = 125
//! bars_5g = 120
//!
//! [price_source]
//! pattern = "الذهب عيار 21 هو (\\d+)"
//! fallback_price = 75.0
//!
//! [diamond]
//! usd_rate = 50.0
//! discount_pct = 80
//!
//! [batch]
//! batch_size = 100
//! ```
//!
//! ## Markups Are Read Leniently
//! `[markup]` mirrors a key-value store: values may be numbers or strings. A
//! missing, negative or unparsable value resolves to zero when priced, which
//! marks the item as unpriced instead of failing the load.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use aurum_core::markup::MarkupSource;
use aurum_core::pricing::clamp_diamond_discount;
use aurum_core::validation::{validate_denomination, validate_retention};
use aurum_core::{PricingPolicy, DEFAULT_RETENTION};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};

/// Prefix for every environment override.
const ENV_PREFIX: &str = "AURUM_";

/// Prefix for per-key markup overrides, e.g. `AURUM_MARKUP_BARS_2_5G`.
const ENV_MARKUP_PREFIX: &str = "AURUM_MARKUP_";

// =============================================================================
// Policy Settings
// =============================================================================

/// Shared policy constants for the price formula and the line enforcer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySettings {
    /// Retention fraction K, within `[0, 1]`.
    #[serde(default = "default_retention")]
    pub retention: Decimal,

    /// Coarse rounding denomination. `None` disables coarse rounding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coarse_rounding: Option<Decimal>,
}

fn default_retention() -> Decimal {
    DEFAULT_RETENTION
}

impl Default for PolicySettings {
    fn default() -> Self {
        PolicySettings {
            retention: default_retention(),
            coarse_rounding: None,
        }
    }
}

// =============================================================================
// Price Source Settings
// =============================================================================

/// How the live base price is found and what to use when it is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSourceSettings {
    /// Pattern run against the fetched page. Empty means "not configured".
    #[serde(default)]
    pub pattern: String,

    /// Last known good base price, used when the live fetch fails.
    #[serde(default = "default_fallback_price")]
    pub fallback_price: Decimal,
}

fn default_fallback_price() -> Decimal {
    Decimal::from(75)
}

impl Default for PriceSourceSettings {
    fn default() -> Self {
        PriceSourceSettings {
            pattern: String::new(),
            fallback_price: default_fallback_price(),
        }
    }
}

// =============================================================================
// Diamond Settings
// =============================================================================

/// Diamond conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiamondSettings {
    /// Local currency per USD.
    #[serde(default = "default_usd_rate")]
    pub usd_rate: Decimal,

    /// Global diamond discount in percent. Clamped into `0..=80` when used.
    #[serde(default = "default_diamond_discount")]
    pub discount_pct: Decimal,
}

fn default_usd_rate() -> Decimal {
    Decimal::from(50)
}

fn default_diamond_discount() -> Decimal {
    Decimal::from(80)
}

impl Default for DiamondSettings {
    fn default() -> Self {
        DiamondSettings {
            usd_rate: default_usd_rate(),
            discount_pct: default_diamond_discount(),
        }
    }
}

impl DiamondSettings {
    /// The discount actually applied, after clamping.
    pub fn effective_discount(&self) -> Decimal {
        clamp_diamond_discount(self.discount_pct)
    }
}

// =============================================================================
// Batch Settings
// =============================================================================

/// Batch repricing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Number of products processed per chunk.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    100
}

impl Default for BatchSettings {
    fn default() -> Self {
        BatchSettings {
            batch_size: default_batch_size(),
        }
    }
}

// =============================================================================
// Main Pricing Configuration
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Retention and coarse rounding.
    #[serde(default)]
    pub policy: PolicySettings,

    /// Raw markup table, keyed like `jewellery_local` or `bars_2_5g`.
    #[serde(default)]
    pub markup: BTreeMap<String, toml::Value>,

    /// Live price pattern and fallback price.
    #[serde(default)]
    pub price_source: PriceSourceSettings,

    /// Diamond conversion.
    #[serde(default)]
    pub diamond: DiamondSettings,

    /// Batch repricing.
    #[serde(default)]
    pub batch: BatchSettings,
}

impl PricingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (pricing.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ServiceResult<Self> {
        Self::load_with_overrides(config_path, std::env::vars())
    }

    /// [`load`](Self::load) with an explicit set of override variables.
    pub fn load_with_overrides<I>(config_path: Option<PathBuf>, vars: I) -> ServiceResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = Self::load_stored(config_path)?;
        config.apply_overrides(vars);
        config.validate()?;
        config.warn_unusable_markups();

        Ok(config)
    }

    /// Reads the config file as stored, without environment overrides.
    ///
    /// Returns defaults when the file does not exist.
    pub fn load_stored(config_path: Option<PathBuf>) -> ServiceResult<Self> {
        let Some(path) = config_path.or_else(Self::default_config_path) else {
            return Ok(Self::default());
        };

        if !path.exists() {
            debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        info!(?path, "Loading pricing config from file");
        let contents = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&contents)
    }

    /// Writes `price` into the stored config as the new fallback price.
    ///
    /// Works on the file as stored, so overrides active in this process are
    /// not written back.
    pub fn persist_fallback_price(
        config_path: Option<PathBuf>,
        price: Decimal,
    ) -> ServiceResult<()> {
        let mut stored = Self::load_stored(config_path.clone())?;
        stored.remember_fallback_price(price);
        stored.save(config_path)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load pricing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document without touching the environment.
    pub fn from_toml_str(contents: &str) -> ServiceResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ServiceResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ServiceError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ServiceError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ServiceError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Pricing config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ServiceResult<()> {
        validate_retention(self.policy.retention)
            .map_err(|e| ServiceError::InvalidConfig(e.to_string()))?;

        if let Some(denomination) = self.policy.coarse_rounding {
            validate_denomination(denomination)
                .map_err(|e| ServiceError::InvalidConfig(e.to_string()))?;
        }

        if self.price_source.fallback_price <= Decimal::ZERO {
            return Err(ServiceError::InvalidConfig(format!(
                "fallback_price must be greater than 0, got: {}",
                self.price_source.fallback_price
            )));
        }

        if self.diamond.usd_rate <= Decimal::ZERO {
            return Err(ServiceError::InvalidConfig(format!(
                "usd_rate must be greater than 0, got: {}",
                self.diamond.usd_rate
            )));
        }

        if self.batch.batch_size == 0 {
            return Err(ServiceError::InvalidConfig(
                "batch_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `AURUM_*` overrides from `vars`.
    ///
    /// Values that do not parse are logged and ignored.
    pub fn apply_overrides<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(setting) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            if let Some(key) = name.strip_prefix(ENV_MARKUP_PREFIX) {
                let key = key.to_lowercase();
                debug!(key = %key, value = %value, "Overriding markup from environment");
                self.markup.insert(key, toml::Value::String(value));
                continue;
            }

            match setting {
                "RETENTION" => {
                    if let Some(retention) = parse_env_decimal(&name, &value) {
                        debug!(%retention, "Overriding retention from environment");
                        self.policy.retention = retention;
                    }
                }
                "COARSE_ROUNDING" => {
                    let trimmed = value.trim();
                    if trimmed == "0" || trimmed.eq_ignore_ascii_case("none") {
                        self.policy.coarse_rounding = None;
                    } else if let Some(denomination) = parse_env_decimal(&name, &value) {
                        self.policy.coarse_rounding = Some(denomination);
                    }
                }
                "PRICE_PATTERN" => {
                    debug!(pattern = %value, "Overriding price pattern from environment");
                    self.price_source.pattern = value;
                }
                "FALLBACK_PRICE" => {
                    if let Some(price) = parse_env_decimal(&name, &value) {
                        self.price_source.fallback_price = price;
                    }
                }
                "USD_RATE" => {
                    if let Some(rate) = parse_env_decimal(&name, &value) {
                        self.diamond.usd_rate = rate;
                    }
                }
                "DIAMOND_DISCOUNT" => {
                    if let Some(discount) = parse_env_decimal(&name, &value) {
                        self.diamond.discount_pct = discount;
                    }
                }
                "BATCH_SIZE" => match value.trim().parse::<usize>() {
                    Ok(size) => self.batch.batch_size = size,
                    Err(_) => {
                        warn!(variable = %name, value = %value, "Ignoring invalid batch size")
                    }
                },
                _ => {}
            }
        }
    }

    /// Records a freshly fetched live price as the new fallback.
    pub fn remember_fallback_price(&mut self, price: Decimal) {
        if price > Decimal::ZERO {
            self.price_source.fallback_price = price;
        }
    }

    /// Builds the validated engine policy.
    pub fn pricing_policy(&self) -> ServiceResult<PricingPolicy> {
        PricingPolicy::new(self.policy.retention, self.policy.coarse_rounding)
            .map_err(|e| ServiceError::InvalidConfig(e.to_string()))
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "aurum", "pos")
            .map(|dirs| dirs.config_dir().join("pricing.toml"))
    }

    /// Logs markup entries that will resolve to zero.
    fn warn_unusable_markups(&self) {
        for key in self.markup.keys() {
            let usable = self
                .markup_param(key)
                .and_then(|raw| {
                    let raw = raw.trim();
                    Decimal::from_str(raw)
                        .or_else(|_| Decimal::from_scientific(raw))
                        .ok()
                })
                .is_some_and(|value| value >= Decimal::ZERO);
            if !usable {
                warn!(
                    key = %key,
                    "Markup value is not a non-negative number; items will be unpriced"
                );
            }
        }
    }
}

fn parse_env_decimal(name: &str, value: &str) -> Option<Decimal> {
    match Decimal::from_str(value.trim()) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(variable = %name, value = %value, "Ignoring non-numeric environment override");
            None
        }
    }
}

// =============================================================================
// Markup Source
// =============================================================================

impl MarkupSource for PricingConfig {
    fn markup_param(&self, key: &str) -> Option<String> {
        match self.markup.get(key)? {
            toml::Value::String(raw) => Some(raw.clone()),
            toml::Value::Integer(value) => Some(value.to_string()),
            toml::Value::Float(value) => Some(value.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurum_core::markup::resolve_markup;
    use aurum_core::GoldType;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"
[policy]
retention = 0.7
coarse_rounding = 50

[markup]
jewellery_local = 200
jewellery_foreign = "180.5"
bars_5g = 125
bars_10g = "120"
bars_20g = "n/a"

[price_source]
pattern = 'هو (\d+)'
fallback_price = 5400

[diamond]
usd_rate = 48.5
discount_pct = 95

[batch]
batch_size = 25
"#;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = PricingConfig::default();
        assert_eq!(config.policy.retention, dec!(0.5));
        assert_eq!(config.policy.coarse_rounding, None);
        assert_eq!(config.price_source.fallback_price, dec!(75));
        assert_eq!(config.diamond.usd_rate, dec!(50));
        assert_eq!(config.diamond.effective_discount(), dec!(80));
        assert_eq!(config.batch.batch_size, 100);
        assert!(config.markup.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = PricingConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.policy.retention, dec!(0.7));
        assert_eq!(config.policy.coarse_rounding, Some(dec!(50)));
        assert_eq!(config.price_source.pattern, r"هو (\d+)");
        assert_eq!(config.price_source.fallback_price, dec!(5400));
        assert_eq!(config.diamond.usd_rate, dec!(48.5));
        assert_eq!(config.diamond.effective_discount(), dec!(80));
        assert_eq!(config.batch.batch_size, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = PricingConfig::from_toml_str("[markup]\nbars_1g = 200\n").unwrap();
        assert_eq!(config.policy, PolicySettings::default());
        assert_eq!(config.batch.batch_size, 100);
    }

    #[test]
    fn test_config_is_a_markup_source() {
        let config = PricingConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(
            resolve_markup(&config, GoldType::JewelleryLocal, None),
            dec!(200)
        );
        assert_eq!(
            resolve_markup(&config, GoldType::JewelleryForeign, None),
            dec!(180.5)
        );
        // 7.5 g sits between 5 g and 10 g; the lower tier wins
        assert_eq!(
            resolve_markup(&config, GoldType::Bars, Some(dec!(7.5))),
            dec!(125)
        );
        // unparsable tier degrades to zero
        assert_eq!(
            resolve_markup(&config, GoldType::Bars, Some(dec!(20))),
            dec!(0)
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = PricingConfig::default();
        assert!(config.validate().is_ok());

        config.policy.retention = dec!(1.5);
        assert!(config.validate().unwrap_err().is_config_error());

        config.policy.retention = dec!(0.5);
        config.policy.coarse_rounding = Some(dec!(0));
        assert!(config.validate().is_err());

        config.policy.coarse_rounding = None;
        config.price_source.fallback_price = dec!(0);
        assert!(config.validate().is_err());

        config.price_source.fallback_price = dec!(75);
        config.batch.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = PricingConfig::default();
        config.apply_overrides(vars(&[
            ("AURUM_RETENTION", "0.7"),
            ("AURUM_COARSE_ROUNDING", "50"),
            ("AURUM_PRICE_PATTERN", r"(\d+)"),
            ("AURUM_FALLBACK_PRICE", "5400.5"),
            ("AURUM_USD_RATE", "49"),
            ("AURUM_DIAMOND_DISCOUNT", "60"),
            ("AURUM_BATCH_SIZE", "10"),
            ("AURUM_MARKUP_BARS_2_5G", "130"),
            ("PATH", "/usr/bin"),
        ]));

        assert_eq!(config.policy.retention, dec!(0.7));
        assert_eq!(config.policy.coarse_rounding, Some(dec!(50)));
        assert_eq!(config.price_source.pattern, r"(\d+)");
        assert_eq!(config.price_source.fallback_price, dec!(5400.5));
        assert_eq!(config.diamond.usd_rate, dec!(49));
        assert_eq!(config.diamond.effective_discount(), dec!(60));
        assert_eq!(config.batch.batch_size, 10);
        assert_eq!(config.markup_param("bars_2_5g"), Some("130".to_string()));
    }

    #[test]
    fn test_overrides_disable_rounding_and_ignore_garbage() {
        let mut config = PricingConfig::from_toml_str(SAMPLE).unwrap();
        config.apply_overrides(vars(&[
            ("AURUM_COARSE_ROUNDING", "none"),
            ("AURUM_RETENTION", "abc"),
            ("AURUM_BATCH_SIZE", "-3"),
        ]));

        assert_eq!(config.policy.coarse_rounding, None);
        assert_eq!(config.policy.retention, dec!(0.7));
        assert_eq!(config.batch.batch_size, 25);
    }

    #[test]
    fn test_pricing_policy() {
        let config = PricingConfig::from_toml_str(SAMPLE).unwrap();
        let policy = config.pricing_policy().unwrap();
        assert_eq!(policy.retention(), dec!(0.7));
        assert_eq!(policy.coarse_rounding(), Some(dec!(50)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = PricingConfig::load(Some(path)).unwrap();
        assert_eq!(config.batch.batch_size, 25);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.toml");
        std::fs::write(&path, "[policy\nretention = ").unwrap();

        let err = PricingConfig::load(Some(path.clone())).unwrap_err();
        assert!(matches!(err, ServiceError::ConfigLoadFailed(_)));

        let config = PricingConfig::load_or_default(Some(path));
        assert_eq!(config.batch.batch_size, 100);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pricing.toml");

        let mut config = PricingConfig::from_toml_str(SAMPLE).unwrap();
        config.remember_fallback_price(dec!(5415));
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let reloaded = PricingConfig::from_toml_str(&contents).unwrap();
        assert_eq!(reloaded.price_source.fallback_price, dec!(5415));
        assert_eq!(reloaded.policy.coarse_rounding, Some(dec!(50)));
        assert_eq!(
            reloaded.markup_param("jewellery_local"),
            Some("200".to_string())
        );
    }

    #[test]
    fn test_persisted_fallback_leaves_overrides_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let overrides = vars(&[("AURUM_RETENTION", "0.5"), ("AURUM_MARKUP_BARS_5G", "999")]);
        let running = PricingConfig::load_with_overrides(Some(path.clone()), overrides).unwrap();
        assert_eq!(running.policy.retention, dec!(0.5));
        assert_eq!(running.markup_param("bars_5g"), Some("999".to_string()));

        PricingConfig::persist_fallback_price(Some(path.clone()), dec!(5415)).unwrap();

        let stored = PricingConfig::load_stored(Some(path)).unwrap();
        assert_eq!(stored.price_source.fallback_price, dec!(5415));
        assert_eq!(stored.policy.retention, dec!(0.7));
        assert_eq!(stored.markup_param("bars_5g"), Some("125".to_string()));
    }

    #[test]
    fn test_load_stored_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let stored = PricingConfig::load_stored(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(stored, PricingConfig::default());
    }

    #[test]
    fn test_remember_fallback_ignores_non_positive() {
        let mut config = PricingConfig::default();
        config.remember_fallback_price(dec!(0));
        assert_eq!(config.price_source.fallback_price, dec!(75));
    }
}
