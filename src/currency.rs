//! Currency
//!
//! Prices are authored in the catalog base currency (USD). The currency store
//! holds the shopper's display currency and the rates used to derive every
//! displayed price; converted amounts are never stored.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors raised by the currency store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    /// The code is not one of the supported display currencies.
    #[error("Unsupported currency: {0}")]
    Unsupported(String),

    /// Rates must be strictly positive.
    #[error("Invalid rate {rate} for {currency}")]
    InvalidRate {
        /// Currency the rate was supplied for
        currency: DisplayCurrency,
        /// Offending rate
        rate: Decimal,
    },

    /// The base currency always converts at 1.
    #[error("The base currency rate cannot be changed")]
    BaseRate,
}

/// Currencies prices can be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayCurrency {
    /// US dollar, the catalog base currency
    #[default]
    Usd,

    /// UAE dirham
    Aed,

    /// Euro
    Eur,

    /// Pound sterling
    Gbp,

    /// Japanese yen
    Jpy,
}

impl DisplayCurrency {
    /// Every display currency, in picker order.
    pub const ALL: [DisplayCurrency; 5] = [
        DisplayCurrency::Usd,
        DisplayCurrency::Aed,
        DisplayCurrency::Eur,
        DisplayCurrency::Gbp,
        DisplayCurrency::Jpy,
    ];

    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        self.iso().iso_alpha_code
    }

    /// Prefix used when formatting prices.
    pub fn symbol(self) -> &'static str {
        match self {
            DisplayCurrency::Usd => "$",
            DisplayCurrency::Aed => "AED ",
            DisplayCurrency::Eur => "€",
            DisplayCurrency::Gbp => "£",
            DisplayCurrency::Jpy => "¥",
        }
    }

    /// Matching ISO currency.
    pub fn iso(self) -> &'static Currency {
        match self {
            DisplayCurrency::Usd => iso::USD,
            DisplayCurrency::Aed => iso::AED,
            DisplayCurrency::Eur => iso::EUR,
            DisplayCurrency::Gbp => iso::GBP,
            DisplayCurrency::Jpy => iso::JPY,
        }
    }

    /// Whether this is the catalog base currency.
    pub fn is_base(self) -> bool {
        self == DisplayCurrency::Usd
    }
}

impl fmt::Display for DisplayCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DisplayCurrency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();

        DisplayCurrency::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| CurrencyError::Unsupported(code.to_string()))
    }
}

/// Conversion rates from the base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRates {
    rates: FxHashMap<DisplayCurrency, Decimal>,
}

impl ExchangeRates {
    /// Override the rate for one currency.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::BaseRate`] for the base currency and
    /// [`CurrencyError::InvalidRate`] for non-positive rates.
    pub fn with_rate(mut self, currency: DisplayCurrency, rate: Decimal) -> Result<Self, CurrencyError> {
        if currency.is_base() {
            return Err(CurrencyError::BaseRate);
        }

        if rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate { currency, rate });
        }

        self.rates.insert(currency, rate);

        Ok(self)
    }

    /// Multiplier from the base currency to `currency`.
    pub fn rate(&self, currency: DisplayCurrency) -> Decimal {
        if currency.is_base() {
            return Decimal::ONE;
        }

        self.rates.get(&currency).copied().unwrap_or(Decimal::ONE)
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        let rates = [
            (DisplayCurrency::Aed, dec!(3.6725)),
            (DisplayCurrency::Eur, dec!(0.92)),
            (DisplayCurrency::Gbp, dec!(0.79)),
            (DisplayCurrency::Jpy, dec!(149.50)),
        ]
        .into_iter()
        .collect();

        Self { rates }
    }
}

/// Active display currency plus the rates used to derive displayed prices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurrencyStore {
    active: DisplayCurrency,
    rates: ExchangeRates,
}

impl CurrencyStore {
    /// Create a store showing the base currency.
    pub fn new(rates: ExchangeRates) -> Self {
        Self {
            active: DisplayCurrency::default(),
            rates,
        }
    }

    /// Start from a different display currency.
    #[must_use]
    pub fn with_currency(mut self, currency: DisplayCurrency) -> Self {
        self.active = currency;
        self
    }

    /// Active display currency.
    pub fn currency(&self) -> DisplayCurrency {
        self.active
    }

    /// Rate for the active currency.
    pub fn rate(&self) -> Decimal {
        self.rates.rate(self.active)
    }

    /// Configured rates.
    pub fn rates(&self) -> &ExchangeRates {
        &self.rates
    }

    /// Switch the display currency.
    pub fn set_currency(&mut self, currency: DisplayCurrency) {
        self.active = currency;
    }

    /// Convert a base-currency amount into the active currency.
    ///
    /// Total over every `Decimal`: a product beyond the representable range
    /// saturates at `Decimal::MAX` (or `Decimal::MIN`).
    pub fn convert_price(&self, amount: Decimal) -> Decimal {
        amount.saturating_mul(self.rate())
    }

    /// Convert a base-currency amount, or `None` if the result overflows.
    pub fn checked_convert_price(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.rate())
    }

    /// Convert and format a base-currency amount for display.
    ///
    /// An amount too large to convert renders as the largest representable
    /// value.
    pub fn format_price(&self, amount: Decimal) -> String {
        format_amount(self.convert_price(amount), self.active)
    }

    /// Convert and format a base-currency money value for display.
    pub fn format_money(&self, money: &Money<'_, Currency>) -> String {
        self.format_price(*money.amount())
    }
}

/// Format an already converted amount: two decimals, comma grouping, symbol
/// prefix.
pub fn format_amount(amount: Decimal, currency: DisplayCurrency) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!(
        "{sign}{}{}.{fraction}",
        currency.symbol(),
        group_thousands(whole)
    )
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);

    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(digit);
    }

    grouped
}
