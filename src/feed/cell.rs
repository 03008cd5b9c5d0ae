//! Versioned spot-price cell

use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use tracing::warn;

use super::FeedError;

/// Where a published price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceOrigin {
    /// Produced by the market simulator
    Simulated,

    /// Read from the live ticker
    Live,
}

/// A published spot price, USD per troy ounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotPrice {
    /// Price per troy ounce
    pub value: Decimal,

    /// Bumped on every successful write
    pub version: u64,

    /// Producer of this value
    pub origin: PriceOrigin,
}

/// Shared holder of the latest spot price.
///
/// Clones share the same value. Writes are accepted only for strictly
/// positive prices, so a failed fetch can never blank the display.
#[derive(Debug, Clone)]
pub struct SpotPriceCell {
    inner: Arc<RwLock<SpotPrice>>,
}

impl SpotPriceCell {
    /// Create a cell seeded with a simulated starting price at version 0.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::NonPositive`] if `initial` is zero or negative.
    pub fn new(initial: Decimal) -> Result<Self, FeedError> {
        if initial <= Decimal::ZERO {
            return Err(FeedError::NonPositive(initial));
        }

        Ok(Self {
            inner: Arc::new(RwLock::new(SpotPrice {
                value: initial,
                version: 0,
                origin: PriceOrigin::Simulated,
            })),
        })
    }

    /// Current price.
    pub fn get(&self) -> SpotPrice {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Current value.
    pub fn value(&self) -> Decimal {
        self.get().value
    }

    /// Current version.
    pub fn version(&self) -> u64 {
        self.get().version
    }

    /// Replace the price and bump the version.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::NonPositive`] and leaves the cell untouched if
    /// `value` is zero or negative.
    pub fn publish(&self, value: Decimal, origin: PriceOrigin) -> Result<SpotPrice, FeedError> {
        if value <= Decimal::ZERO {
            warn!(%value, ?origin, "rejected non-positive spot price");

            return Err(FeedError::NonPositive(value));
        }

        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        *guard = SpotPrice {
            value,
            version: guard.version.wrapping_add(1),
            origin,
        };

        Ok(*guard)
    }
}
