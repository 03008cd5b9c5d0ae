use aurum::{
    currency::CurrencyStore,
    feed::{HttpSpotPriceSource, MarketSimulator, PriceOrigin, SpotFeed, SpotPrice, SpotPriceCell},
    sparkline::{PriceHistory, area_path, fit_points, smooth_path},
};
use leptos::prelude::*;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{
    config::FeedConfig,
    timing::{Generation, spawn, wait_for_timeout},
};

const SPARKLINE_WIDTH: f64 = 240.0;
const SPARKLINE_HEIGHT: f64 = 64.0;
const SPARKLINE_PADDING: f64 = 4.0;

/// Direction of the recent move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Price rose over the window.
    Up,

    /// Price fell over the window.
    Down,

    /// No move, or not enough samples.
    Flat,
}

impl Trend {
    fn class(self) -> &'static str {
        match self {
            Trend::Up => "ticker-change-up",
            Trend::Down => "ticker-change-down",
            Trend::Flat => "ticker-change-flat",
        }
    }
}

/// Signed percentage with two decimals, plus its direction.
pub fn format_change(change: Option<Decimal>) -> (String, Trend) {
    let Some(change) = change.map(|change| change.round_dp(2)) else {
        return ("0.00%".to_string(), Trend::Flat);
    };

    if change.is_zero() {
        ("0.00%".to_string(), Trend::Flat)
    } else if change.is_sign_positive() {
        (format!("+{change:.2}%"), Trend::Up)
    } else {
        (format!("{change:.2}%"), Trend::Down)
    }
}

/// SVG paths for the sparkline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SparklinePaths {
    /// Stroke path.
    pub line: String,

    /// Filled area under the stroke.
    pub area: String,
}

/// Sparkline geometry for the recorded history.
pub fn sparkline_paths(history: &PriceHistory) -> SparklinePaths {
    let points = fit_points(
        &history.values(),
        SPARKLINE_WIDTH,
        SPARKLINE_HEIGHT,
        SPARKLINE_PADDING,
    );

    if points.len() < 2 {
        return SparklinePaths::default();
    }

    SparklinePaths {
        line: smooth_path(&points),
        area: area_path(&points, SPARKLINE_HEIGHT),
    }
}

/// Badge label for the price origin.
pub fn origin_label(origin: PriceOrigin) -> &'static str {
    match origin {
        PriceOrigin::Live => "LIVE",
        PriceOrigin::Simulated => "SIM",
    }
}

fn record(spot: RwSignal<SpotPrice>, history: RwSignal<PriceHistory>, price: SpotPrice) {
    let is_newer = spot
        .try_get_untracked()
        .is_some_and(|shown| price.version > shown.version);

    if !is_newer {
        return;
    }

    spot.try_set(price);
    history.try_update(|history| history.push(price.value));
}

fn start_simulation(
    feed: &FeedConfig,
    cell: SpotPriceCell,
    spot: RwSignal<SpotPrice>,
    history: RwSignal<PriceHistory>,
    generation: Generation,
) {
    let run_id = generation.run_id();
    let every_ms = feed.simulate_every_ms;
    let mut simulator = MarketSimulator::new(feed.volatility);

    spawn(async move {
        loop {
            wait_for_timeout(every_ms).await;

            if !generation.is_current(run_id) {
                debug!("spot simulation stopped");
                break;
            }

            match simulator.step(&cell) {
                Ok(price) => record(spot, history, price),
                Err(error) => debug!(%error, "simulated step skipped"),
            }
        }
    });
}

fn start_live_feed(
    url: String,
    feed: &FeedConfig,
    cell: SpotPriceCell,
    spot: RwSignal<SpotPrice>,
    history: RwSignal<PriceHistory>,
    generation: Generation,
) {
    let run_id = generation.run_id();
    let every_ms = feed.live_every_ms;
    let live = SpotFeed::new(HttpSpotPriceSource::new(url, feed.price_field.clone()), cell);

    spawn(async move {
        loop {
            let refreshed = live.refresh().await;

            if !generation.is_current(run_id) {
                debug!("live spot feed stopped");
                break;
            }

            if refreshed {
                record(spot, history, live.cell().get());
            }

            wait_for_timeout(every_ms).await;

            if !generation.is_current(run_id) {
                debug!("live spot feed stopped");
                break;
            }
        }
    });
}

/// Spot price panel with change and sparkline.
#[component]
pub fn TickerPanel(
    /// Feed settings.
    feed: FeedConfig,

    /// Shared price cell written by both producers.
    cell: SpotPriceCell,

    /// Latest price shown by the UI.
    spot: RwSignal<SpotPrice>,

    /// Display currency.
    currency: RwSignal<CurrencyStore>,
) -> impl IntoView {
    let history = RwSignal::new({
        let mut history = PriceHistory::new(feed.history_len);
        history.push(cell.value());
        history
    });

    let generation = Generation::new();
    generation.cancel_on_cleanup();

    start_simulation(&feed, cell.clone(), spot, history, generation);

    match feed.url.clone() {
        Some(url) => {
            info!(%url, "live spot feed enabled");
            start_live_feed(url, &feed, cell, spot, history, generation);
        }
        None => info!("live spot feed disabled, simulating only"),
    }

    let price = move || {
        let value = spot.get().value;
        currency.with(|currency| currency.format_price(value))
    };
    let change = move || history.with(|history| format_change(history.change_percent()));
    let paths = move || history.with(sparkline_paths);

    view! {
        <section id="ticker" class="ticker" aria-label="Gold spot price">
            <div class="ticker-heading">
                <p class="ticker-label">"Gold spot · per troy ounce"</p>
                <span
                    class="ticker-origin"
                    class:ticker-origin-live=move || spot.get().origin == PriceOrigin::Live
                >
                    {move || origin_label(spot.get().origin)}
                </span>
            </div>
            <p class="ticker-price">{price}</p>
            <p class=move || format!("ticker-change {}", change().1.class())>{move || change().0}</p>
            <svg
                class="ticker-sparkline"
                viewBox=format!("0 0 {SPARKLINE_WIDTH} {SPARKLINE_HEIGHT}")
                preserveAspectRatio="none"
                aria-hidden="true"
            >
                <path class="ticker-sparkline-area" d=move || paths().area></path>
                <path class="ticker-sparkline-line" d=move || paths().line fill="none"></path>
            </svg>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn change_is_signed_with_two_decimals() {
        assert_eq!(format_change(Some(dec!(2.5))), ("+2.50%".to_string(), Trend::Up));
        assert_eq!(format_change(Some(dec!(-0.126))), ("-0.13%".to_string(), Trend::Down));
        assert_eq!(format_change(Some(dec!(0.001))), ("0.00%".to_string(), Trend::Flat));
        assert_eq!(format_change(None), ("0.00%".to_string(), Trend::Flat));
    }

    #[test]
    fn sparkline_needs_two_samples() {
        let mut history = PriceHistory::new(5);

        assert_eq!(sparkline_paths(&history), SparklinePaths::default());

        history.push(dec!(2345.60));

        assert_eq!(sparkline_paths(&history), SparklinePaths::default());

        history.push(dec!(2350.10));

        let paths = sparkline_paths(&history);

        assert!(paths.line.starts_with("M 4.00 60.00"));
        assert!(paths.area.ends_with('Z'));
    }

    #[test]
    fn stale_versions_are_not_recorded() -> TestResult {
        let cell = SpotPriceCell::new(dec!(2000))?;
        let spot = RwSignal::new(cell.get());
        let history = RwSignal::new(PriceHistory::new(5));

        let newer = cell.publish(dec!(2001), PriceOrigin::Simulated)?;
        record(spot, history, newer);
        record(spot, history, newer);

        assert_eq!(spot.get_untracked(), newer);
        assert_eq!(history.with_untracked(PriceHistory::len), 1);

        Ok(())
    }

    #[test]
    fn origin_badges() {
        assert_eq!(origin_label(PriceOrigin::Live), "LIVE");
        assert_eq!(origin_label(PriceOrigin::Simulated), "SIM");
    }
}
