//! Spot-price feed
//!
//! The ticker shows a gold spot price that drifts under a simulator and is
//! periodically replaced by a live quote when one is available. Both write
//! into a shared [`SpotPriceCell`]; a failed live fetch never touches it.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

mod cell;
mod http;
mod simulator;

pub use cell::{PriceOrigin, SpotPrice, SpotPriceCell};
pub use http::{HttpSpotPriceSource, extract_price};
pub use simulator::MarketSimulator;

/// Errors raised while fetching or publishing a spot price.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport or body decoding failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The ticker answered with a non-success status.
    #[error("ticker responded with status {0}")]
    Status(u16),

    /// The price field is absent from the response.
    #[error("ticker response has no field {0}")]
    MissingField(String),

    /// The price field is present but not numeric.
    #[error("malformed ticker price: {0}")]
    Malformed(String),

    /// Prices must be strictly positive.
    #[error("non-positive spot price {0}")]
    NonPositive(Decimal),
}

/// Something that can quote the current spot price.
#[cfg_attr(test, automock)]
#[async_trait(?Send)]
pub trait SpotPriceSource {
    /// Fetch the latest price per troy ounce.
    async fn fetch(&self) -> Result<Decimal, FeedError>;
}

/// A live source wired to the cell it updates.
#[derive(Debug)]
pub struct SpotFeed<S> {
    source: S,
    cell: SpotPriceCell,
}

impl<S: SpotPriceSource> SpotFeed<S> {
    /// Feed `cell` from `source`.
    pub fn new(source: S, cell: SpotPriceCell) -> Self {
        Self { source, cell }
    }

    /// Cell receiving live prices.
    pub fn cell(&self) -> &SpotPriceCell {
        &self.cell
    }

    /// Fetch once and publish on success.
    ///
    /// Returns `true` if a live price was written. Any failure is logged and
    /// swallowed, leaving the last value in place.
    pub async fn refresh(&self) -> bool {
        let published = self
            .source
            .fetch()
            .await
            .and_then(|value| self.cell.publish(value, PriceOrigin::Live));

        match published {
            Ok(price) => {
                debug!(value = %price.value, version = price.version, "live spot price published");
                true
            }
            Err(error) => {
                debug!(%error, "live spot price unavailable, keeping last value");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn successful_fetch_publishes_live_price() -> TestResult {
        let mut source = MockSpotPriceSource::new();
        source.expect_fetch().times(1).returning(|| Ok(dec!(2412.75)));

        let feed = SpotFeed::new(source, SpotPriceCell::new(dec!(2400))?);

        assert!(feed.refresh().await);
        assert_eq!(
            feed.cell().get(),
            SpotPrice {
                value: dec!(2412.75),
                version: 1,
                origin: PriceOrigin::Live,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_value() -> TestResult {
        let mut source = MockSpotPriceSource::new();
        source.expect_fetch().returning(|| Err(FeedError::Status(503)));

        let cell = SpotPriceCell::new(dec!(2400))?;
        let feed = SpotFeed::new(source, cell.clone());

        assert!(!feed.refresh().await);
        assert_eq!(cell.value(), dec!(2400));
        assert_eq!(cell.version(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn non_positive_quote_is_not_published() -> TestResult {
        let mut source = MockSpotPriceSource::new();
        source.expect_fetch().returning(|| Ok(Decimal::ZERO));

        let feed = SpotFeed::new(source, SpotPriceCell::new(dec!(2400))?);

        assert!(!feed.refresh().await);
        assert_eq!(feed.cell().value(), dec!(2400));

        Ok(())
    }

    #[test]
    fn status_error_names_the_code() {
        assert_eq!(
            FeedError::Status(500).to_string(),
            "ticker responded with status 500"
        );
    }
}
