//! HTTP ticker source

use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{FeedError, SpotPriceSource};

/// Reads a last-traded price from a JSON ticker endpoint.
#[derive(Debug, Clone)]
pub struct HttpSpotPriceSource {
    url: String,
    price_field: String,
    http: Client,
}

impl HttpSpotPriceSource {
    /// Create a source for `url`, reading the price at `price_field`.
    ///
    /// Nested fields use dots, e.g. `"data.last"`.
    #[must_use]
    pub fn new(url: impl Into<String>, price_field: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            price_field: price_field.into(),
            http: Client::new(),
        }
    }

    /// Endpoint being polled.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl SpotPriceSource for HttpSpotPriceSource {
    async fn fetch(&self) -> Result<Decimal, FeedError> {
        let response = self.http.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;

        extract_price(&body, &self.price_field)
    }
}

/// Read a positive price from `body` at the dotted `field` path.
///
/// Numbers and numeric strings are both accepted.
///
/// # Errors
///
/// Returns [`FeedError::MissingField`] if the path does not exist,
/// [`FeedError::Malformed`] if the value is not numeric and
/// [`FeedError::NonPositive`] for zero or negative prices.
pub fn extract_price(body: &Value, field: &str) -> Result<Decimal, FeedError> {
    let pointer: String = field.split('.').map(|segment| format!("/{segment}")).collect();

    let raw = body
        .pointer(&pointer)
        .ok_or_else(|| FeedError::MissingField(field.to_string()))?;

    let text = match raw {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        other => return Err(FeedError::Malformed(format!("{field} is {other}"))),
    };

    let value = Decimal::from_str(&text)
        .or_else(|_err| Decimal::from_scientific(&text))
        .map_err(|err| FeedError::Malformed(format!("{field}: {err}")))?;

    if value <= Decimal::ZERO {
        return Err(FeedError::NonPositive(value));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn reads_numeric_field() -> TestResult {
        let body = json!({ "last": 2345.25 });

        assert_eq!(extract_price(&body, "last")?, dec!(2345.25));

        Ok(())
    }

    #[test]
    fn reads_string_field() -> TestResult {
        let body = json!({ "symbol": "XAUUSD", "price": " 2401.10 " });

        assert_eq!(extract_price(&body, "price")?, dec!(2401.10));

        Ok(())
    }

    #[test]
    fn reads_nested_field() -> TestResult {
        let body = json!({ "data": { "last": "2399.5" } });

        assert_eq!(extract_price(&body, "data.last")?, dec!(2399.5));

        Ok(())
    }

    #[test]
    fn reads_scientific_notation() -> TestResult {
        let body = json!({ "price": "2.4e3" });

        assert_eq!(extract_price(&body, "price")?, dec!(2400));

        Ok(())
    }

    #[test]
    fn missing_field_is_reported() {
        let body = json!({ "bid": 1 });

        assert!(matches!(
            extract_price(&body, "last"),
            Err(FeedError::MissingField(field)) if field == "last"
        ));
    }

    #[test]
    fn non_numeric_values_are_malformed() {
        for body in [json!({ "last": "n/a" }), json!({ "last": null }), json!({ "last": [1] })] {
            assert!(matches!(
                extract_price(&body, "last"),
                Err(FeedError::Malformed(_))
            ));
        }
    }

    #[test]
    fn zero_price_is_rejected() {
        let body = json!({ "last": 0 });

        assert!(matches!(
            extract_price(&body, "last"),
            Err(FeedError::NonPositive(_))
        ));
    }

    #[test]
    fn keeps_configured_url() {
        let source = HttpSpotPriceSource::new("https://ticker.example.com/xau", "last");

        assert_eq!(source.url(), "https://ticker.example.com/xau");
    }
}
