//! Market simulator

use decimal_percentage::Percentage;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;

use super::{FeedError, PriceOrigin, SpotPrice, SpotPriceCell};

/// Resolution of a random shock, in steps per unit.
const SHOCK_STEPS: i64 = 10_000;

/// Bounded random walk that keeps the ticker moving between live updates.
#[derive(Debug)]
pub struct MarketSimulator<R = StdRng> {
    volatility: Decimal,
    rng: R,
}

impl MarketSimulator<StdRng> {
    /// Simulator seeded from system entropy.
    pub fn new(volatility: Percentage) -> Self {
        Self::with_rng(volatility, StdRng::from_entropy())
    }
}

impl<R: Rng> MarketSimulator<R> {
    /// Simulator driven by `rng`.
    pub fn with_rng(volatility: Percentage, rng: R) -> Self {
        Self {
            volatility: volatility * Decimal::ONE,
            rng,
        }
    }

    /// Maximum relative move per step, as a fraction.
    pub fn volatility(&self) -> Decimal {
        self.volatility
    }

    /// Move the cell's price by at most `volatility` in either direction.
    ///
    /// A move that would reach zero or below leaves the price where it is.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::NonPositive`] only if the cell rejects the write.
    pub fn step(&mut self, cell: &SpotPriceCell) -> Result<SpotPrice, FeedError> {
        let current = cell.value();
        let shock = Decimal::new(self.rng.gen_range(-SHOCK_STEPS..=SHOCK_STEPS), 4);
        let max_move = current * self.volatility;

        let mut next = (current + max_move * shock).round_dp(2);

        if next <= Decimal::ZERO {
            next = current;
        }

        cell.publish(next, PriceOrigin::Simulated)
    }
}
