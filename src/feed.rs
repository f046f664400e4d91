//! Position performance feed
//!
//! The chart only consumes [`GainPoint`] series. Until the bot exposes real
//! position history, [`SimulatedFeed`] produces a plausible random walk.

use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How often the chart asks its feed for a fresh series
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Hours of history in a simulated series
const SERIES_HOURS: i64 = 8;

/// One point on the position gains chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GainPoint {
    /// Wall-clock `HH:MM`
    pub time: String,
    /// Cumulative gain in percent, two decimals
    pub gain_pct: f64,
}

/// Source of chart data, kept apart from any rendering
pub trait PerformanceFeed {
    /// Gain series for `symbol` ending at `end`, oldest first
    fn series(&mut self, symbol: &str, end: NaiveDateTime) -> Vec<GainPoint>;
}

/// Random-walk placeholder feed
#[derive(Debug)]
pub struct SimulatedFeed<R = StdRng> {
    rng: R,
    volatility: f64,
}

impl SimulatedFeed<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic feed for reproducible charts and tests
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SimulatedFeed<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SimulatedFeed<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            volatility: 0.2,
        }
    }

    /// Maximum absolute hourly move, in percentage points
    #[must_use]
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility.abs();
        self
    }
}

impl<R: Rng> PerformanceFeed for SimulatedFeed<R> {
    fn series(&mut self, symbol: &str, end: NaiveDateTime) -> Vec<GainPoint> {
        let drift = symbol_drift(symbol);
        let mut last = 0.0;

        (0..=SERIES_HOURS)
            .map(|i| {
                let time = end - TimeDelta::hours(SERIES_HOURS - i);
                if i > 0 {
                    let change = self.rng.gen_range(-1.0..1.0) * self.volatility;
                    last += change + drift;
                }
                GainPoint {
                    time: time.format("%H:%M").to_string(),
                    gain_pct: round2(last),
                }
            })
            .collect()
    }
}

/// Per-hour trend so the demo symbols look different from each other
fn symbol_drift(symbol: &str) -> f64 {
    if symbol.contains("AAPL") {
        0.1
    } else if symbol.contains("MSFT") {
        0.05
    } else if symbol.contains("GOOGL") {
        -0.02
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn end() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .and_then(|d| d.and_hms_opt(16, 30, 0))
            .unwrap()
    }

    #[test]
    fn test_series_shape() {
        let series = SimulatedFeed::seeded(7).series("Netflix (NFLX)", end());
        assert_eq!(series.len(), 9);
        assert_eq!(series[0].time, "08:30");
        assert_eq!(series[8].time, "16:30");
        assert_eq!(series[0].gain_pct, 0.0);
        for point in &series {
            assert_eq!(point.gain_pct, round2(point.gain_pct));
        }
    }

    #[test]
    fn test_seeded_feed_is_reproducible() {
        let a = SimulatedFeed::seeded(42).series("Tesla Inc. (TSLA)", end());
        let b = SimulatedFeed::seeded(42).series("Tesla Inc. (TSLA)", end());
        assert_eq!(a, b);
    }

    #[test]
    fn test_moves_stay_within_volatility() {
        let series = SimulatedFeed::seeded(3).series("Nvidia", end());
        for pair in series.windows(2) {
            // rounding can add up to a cent on either side
            assert!((pair[1].gain_pct - pair[0].gain_pct).abs() <= 0.2 + 0.011);
        }
    }

    #[test]
    fn test_drift_without_noise() {
        let mut feed = SimulatedFeed::seeded(1).with_volatility(0.0);
        let apple: Vec<f64> = feed
            .series("Apple Inc. (AAPL)", end())
            .iter()
            .map(|p| p.gain_pct)
            .collect();
        assert_eq!(apple, [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]);

        let google = feed.series("Google (GOOGL)", end());
        assert_eq!(google[8].gain_pct, -0.16);
    }

    #[test]
    fn test_serializes_chart_keys() {
        let point = GainPoint {
            time: "09:00".into(),
            gain_pct: 1.25,
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json, serde_json::json!({"time": "09:00", "gainPct": 1.25}));
    }
}
