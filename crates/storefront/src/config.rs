//! Storefront configuration.

use std::{collections::BTreeMap, str::FromStr};

use aurum::{
    currency::{CurrencyError, DisplayCurrency, ExchangeRates},
    fixtures::{FixtureError, parse_percentage},
};
use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

const STOREFRONT_CONFIG_YAML: &str = include_str!("../config/storefront.yml");

/// Errors raised while loading the storefront configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be parsed.
    #[error("Failed to parse storefront config: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A currency code or rate is invalid.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// A decimal value could not be parsed.
    #[error("Invalid number for {field}: {value}")]
    InvalidNumber {
        /// Setting name
        field: &'static str,
        /// Offending value
        value: String,
    },

    /// The volatility is not a percentage.
    #[error("Invalid feed volatility: {0}")]
    Volatility(#[from] FixtureError),

    /// A setting is outside its allowed range.
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StorefrontConfigFile {
    default_currency: String,

    #[serde(default)]
    rates: BTreeMap<String, String>,

    feed: FeedConfigFile,

    #[serde(default = "default_log_level")]
    log_level: String,

    inquiry_delay_ms: u32,

    checkout_delay_ms: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeedConfigFile {
    #[serde(default)]
    url: Option<String>,

    price_field: String,

    simulate_every_ms: u32,

    live_every_ms: u32,

    volatility: String,

    history_len: usize,

    initial_price: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Spot-price feed settings.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Live ticker endpoint; the simulator runs alone when absent
    pub url: Option<String>,

    /// Dotted path to the price in the ticker response
    pub price_field: String,

    /// Simulator tick interval
    pub simulate_every_ms: i32,

    /// Live poll interval
    pub live_every_ms: i32,

    /// Maximum relative simulator move per tick
    pub volatility: Percentage,

    /// Samples kept for the sparkline
    pub history_len: usize,

    /// Price shown before the first tick
    pub initial_price: Decimal,
}

/// Storefront settings.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Currency selected on first load
    pub default_currency: DisplayCurrency,

    /// Display currency rates
    pub rates: ExchangeRates,

    /// Spot-price feed
    pub feed: FeedConfig,

    /// Default tracing filter directive
    pub log_level: String,

    /// Artificial delay before an inquiry is acknowledged
    pub inquiry_delay_ms: i32,

    /// Artificial delay before an order is confirmed
    pub checkout_delay_ms: i32,
}

impl StorefrontConfig {
    /// Load the configuration shipped with the storefront.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the embedded document is invalid.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_yaml(STOREFRONT_CONFIG_YAML)
    }

    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when parsing fails or any value is out of
    /// range.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file: StorefrontConfigFile = serde_norway::from_str(yaml)?;

        Self::try_from(file)
    }
}

impl TryFrom<StorefrontConfigFile> for StorefrontConfig {
    type Error = ConfigError;

    fn try_from(file: StorefrontConfigFile) -> Result<Self, Self::Error> {
        let default_currency = DisplayCurrency::from_str(&file.default_currency)?;

        let mut rates = ExchangeRates::default();

        for (code, rate) in &file.rates {
            let currency = DisplayCurrency::from_str(code)?;
            let rate = parse_decimal("rates", rate)?;

            rates = rates.with_rate(currency, rate)?;
        }

        Ok(Self {
            default_currency,
            rates,
            feed: FeedConfig::try_from(file.feed)?,
            log_level: file.log_level,
            inquiry_delay_ms: millis(file.inquiry_delay_ms),
            checkout_delay_ms: millis(file.checkout_delay_ms),
        })
    }
}

impl TryFrom<FeedConfigFile> for FeedConfig {
    type Error = ConfigError;

    fn try_from(file: FeedConfigFile) -> Result<Self, Self::Error> {
        if file.simulate_every_ms == 0 {
            return Err(ConfigError::NotPositive("feed.simulate_every_ms"));
        }

        if file.live_every_ms == 0 {
            return Err(ConfigError::NotPositive("feed.live_every_ms"));
        }

        if file.history_len == 0 {
            return Err(ConfigError::NotPositive("feed.history_len"));
        }

        let initial_price = parse_decimal("feed.initial_price", &file.initial_price)?;

        if initial_price <= Decimal::ZERO {
            return Err(ConfigError::NotPositive("feed.initial_price"));
        }

        Ok(Self {
            url: file.url.filter(|url| !url.trim().is_empty()),
            price_field: file.price_field,
            simulate_every_ms: millis(file.simulate_every_ms),
            live_every_ms: millis(file.live_every_ms),
            volatility: parse_percentage(&file.volatility)?,
            history_len: file.history_len,
            initial_price,
        })
    }
}

fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|_err| ConfigError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Browser timers take an `i32`; larger values are clamped.
fn millis(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    const MINIMAL: &str = r#"
default_currency: GBP
feed:
  price_field: last
  simulate_every_ms: 1000
  live_every_ms: 5000
  volatility: "0.2%"
  history_len: 10
  initial_price: "2300"
inquiry_delay_ms: 10
checkout_delay_ms: 20
"#;

    #[test]
    fn bundled_config_loads() -> TestResult {
        let config = StorefrontConfig::bundled()?;

        assert_eq!(config.default_currency, DisplayCurrency::Usd);
        assert_eq!(config.rates.rate(DisplayCurrency::Aed), dec!(3.6725));
        assert!(config.feed.url.is_some());
        assert_eq!(config.feed.volatility, Percentage::from(dec!(0.0015)));

        Ok(())
    }

    #[test]
    fn minimal_config_uses_defaults() -> TestResult {
        let config = StorefrontConfig::from_yaml(MINIMAL)?;

        assert_eq!(config.default_currency, DisplayCurrency::Gbp);
        assert_eq!(config.rates, ExchangeRates::default());
        assert_eq!(config.log_level, "info");
        assert!(config.feed.url.is_none());
        assert_eq!(config.feed.initial_price, dec!(2300));

        Ok(())
    }

    #[test]
    fn rate_overrides_apply() -> TestResult {
        let yaml = format!("{MINIMAL}rates:\n  EUR: \"0.95\"\n");

        let config = StorefrontConfig::from_yaml(&yaml)?;

        assert_eq!(config.rates.rate(DisplayCurrency::Eur), dec!(0.95));
        assert_eq!(config.rates.rate(DisplayCurrency::Gbp), dec!(0.79));

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let yaml = MINIMAL.replace("default_currency: GBP", "default_currency: CHF");

        let result = StorefrontConfig::from_yaml(&yaml);

        assert!(matches!(
            result,
            Err(ConfigError::Currency(CurrencyError::Unsupported(_)))
        ));
    }

    #[test]
    fn zero_rate_is_rejected() {
        let yaml = format!("{MINIMAL}rates:\n  JPY: \"0\"\n");

        let result = StorefrontConfig::from_yaml(&yaml);

        assert!(matches!(
            result,
            Err(ConfigError::Currency(CurrencyError::InvalidRate { .. }))
        ));
    }

    #[test]
    fn bad_volatility_is_rejected() {
        let yaml = MINIMAL.replace("\"0.2%\"", "\"lots\"");

        let result = StorefrontConfig::from_yaml(&yaml);

        assert!(matches!(result, Err(ConfigError::Volatility(_))));
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let yaml = MINIMAL.replace("simulate_every_ms: 1000", "simulate_every_ms: 0");

        let result = StorefrontConfig::from_yaml(&yaml);

        assert!(matches!(
            result,
            Err(ConfigError::NotPositive("feed.simulate_every_ms"))
        ));
    }

    #[test]
    fn blank_url_disables_live_feed() -> TestResult {
        let yaml = MINIMAL.replace("  price_field: last", "  url: \"  \"\n  price_field: last");

        let config = StorefrontConfig::from_yaml(&yaml)?;

        assert!(config.feed.url.is_none());

        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let yaml = format!("{MINIMAL}theme: dark\n");

        assert!(matches!(
            StorefrontConfig::from_yaml(&yaml),
            Err(ConfigError::Yaml(_))
        ));
    }
}
