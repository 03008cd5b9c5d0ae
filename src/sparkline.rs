//! Sparkline
//!
//! Geometry for the ticker's decorative price line: a bounded history of
//! samples, a fit into an SVG view box, and a smoothed path through the
//! fitted points.

use std::collections::VecDeque;

use rust_decimal::{Decimal, prelude::ToPrimitive};

/// Bounded history of recent prices; the oldest sample is evicted first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceHistory {
    samples: VecDeque<Decimal>,
    capacity: usize,
}

impl PriceHistory {
    /// History holding at most `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when full.
    pub fn push(&mut self, value: Decimal) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }

        self.samples.push_back(value);
    }

    /// Samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Decimal> {
        self.samples.iter()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<Decimal> {
        self.samples.back().copied()
    }

    /// Percent change from the oldest to the newest sample.
    ///
    /// `None` with fewer than two samples or a zero starting price.
    pub fn change_percent(&self) -> Option<Decimal> {
        if self.samples.len() < 2 {
            return None;
        }

        let first = *self.samples.front()?;
        let last = *self.samples.back()?;

        if first.is_zero() {
            return None;
        }

        Some((last - first) / first * Decimal::ONE_HUNDRED)
    }

    /// Samples as floats for plotting.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().filter_map(ToPrimitive::to_f64).collect()
    }
}

/// A point in SVG user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal position
    pub x: f64,

    /// Vertical position, growing downwards
    pub y: f64,
}

/// Map `values` into a `width` by `height` box inset by `padding`.
///
/// Samples are spread evenly left to right; higher values sit higher on the
/// screen. A flat series is drawn along the vertical centre.
pub fn fit_points(values: &[f64], width: f64, height: f64, padding: f64) -> Vec<Point> {
    let Some(segments) = values.len().checked_sub(1) else {
        return Vec::new();
    };

    let inner_width = (width - 2.0 * padding).max(0.0);
    let inner_height = (height - 2.0 * padding).max(0.0);

    let step = match u32::try_from(segments) {
        Ok(0) => 0.0,
        Ok(segments) => inner_width / f64::from(segments),
        Err(_) => inner_width / f64::from(u32::MAX),
    };

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let mut x = padding;

    values
        .iter()
        .map(|value| {
            let y = if range.abs() < f64::EPSILON {
                height / 2.0
            } else {
                padding + (1.0 - (value - min) / range) * inner_height
            };

            let point = Point { x, y };
            x += step;

            point
        })
        .collect()
}

/// Smooth SVG path through `points` (Catmull-Rom converted to cubic Bézier).
///
/// An empty slice yields an empty path and a single point yields a bare move.
pub fn smooth_path(points: &[Point]) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };

    let mut path = format!("M {:.2} {:.2}", first.x, first.y);

    for (index, window) in points.windows(2).enumerate() {
        let (Some(p1), Some(p2)) = (window.first(), window.get(1)) else {
            continue;
        };

        let p0 = index
            .checked_sub(1)
            .and_then(|previous| points.get(previous))
            .unwrap_or(p1);
        let p3 = points.get(index + 2).unwrap_or(p2);

        let c1 = Point {
            x: p1.x + (p2.x - p0.x) / 6.0,
            y: p1.y + (p2.y - p0.y) / 6.0,
        };
        let c2 = Point {
            x: p2.x - (p3.x - p1.x) / 6.0,
            y: p2.y - (p3.y - p1.y) / 6.0,
        };

        path.push_str(&format!(
            " C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
            c1.x, c1.y, c2.x, c2.y, p2.x, p2.y
        ));
    }

    path
}

/// Closed fill area under the smoothed line, down to `baseline`.
pub fn area_path(points: &[Point], baseline: f64) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };

    format!(
        "{} L {:.2} {baseline:.2} L {:.2} {baseline:.2} Z",
        smooth_path(points),
        last.x,
        first.x
    )
}
