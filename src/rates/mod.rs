use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::clock;

/// Which rate chart family applies to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MilkType {
    Buffalo,
    Cow,
}

impl fmt::Display for MilkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MilkType::Buffalo => write!(f, "buffalo"),
            MilkType::Cow => write!(f, "cow"),
        }
    }
}

/// Buffalo rates were revised once; records on or after this date price
/// against the 2026 chart, everything earlier against the legacy chart.
pub const BUFFALO_RATE_CHANGE: &str = "2026-02-01";

/// Rate regime in force on a given date. Cow rates have never changed,
/// so the regime only matters for buffalo milk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Legacy,
    Effective2026,
}

impl Regime {
    /// Dates are ISO YYYY-MM-DD strings, so a lexical comparison against
    /// the threshold is a date comparison.
    pub fn for_date(date: &str) -> Regime {
        if date >= BUFFALO_RATE_CHANGE {
            Regime::Effective2026
        } else {
            Regime::Legacy
        }
    }
}

/// Immutable price-per-liter chart keyed by fat decile (fat x 10).
/// Charts are contiguous in 0.1 steps, so a lookup is a bounds check
/// plus an index.
pub struct RateChart {
    min_decile: i64,
    rates: &'static [f64],
}

impl RateChart {
    pub fn get(&self, decile: i64) -> Option<f64> {
        let idx = decile.checked_sub(self.min_decile)?;
        usize::try_from(idx).ok().and_then(|i| self.rates.get(i)).copied()
    }
}

/// Buffalo chart in force before February 2026 (fat 5.0 - 10.0).
pub static BUFFALO_RATE_CHART_LEGACY: RateChart = RateChart {
    min_decile: 50,
    rates: &[
        38.70, 39.47, 40.25, 41.02, 41.80, // 5.0 - 5.4
        42.57, 43.34, 44.12, 44.89, 45.67, // 5.5 - 5.9
        46.44, 47.21, 47.99, 48.76, 49.54, // 6.0 - 6.4
        50.31, 51.08, 51.86, 52.63, 53.41, // 6.5 - 6.9
        54.18, 54.95, 55.73, 56.50, 57.28, // 7.0 - 7.4
        58.05, 58.82, 59.60, 60.37, 61.15, // 7.5 - 7.9
        61.92, 62.69, 63.47, 64.24, 65.02, // 8.0 - 8.4
        65.79, 66.56, 67.34, 68.11, 68.89, // 8.5 - 8.9
        69.66, 70.43, 71.21, 71.98, 72.76, // 9.0 - 9.4
        73.53, 74.30, 75.08, 75.85, 76.63, // 9.5 - 9.9
        77.40, // 10.0
    ],
};

/// Buffalo chart effective 2026-02-01 (fat 5.0 - 10.0).
pub static BUFFALO_RATE_CHART_2026: RateChart = RateChart {
    min_decile: 50,
    rates: &[
        40.00, 40.80, 41.60, 42.40, 43.20, // 5.0 - 5.4
        44.00, 44.80, 45.60, 46.40, 47.20, // 5.5 - 5.9
        48.00, 48.80, 49.60, 50.40, 51.20, // 6.0 - 6.4
        52.00, 52.80, 53.60, 54.40, 55.20, // 6.5 - 6.9
        56.00, 56.80, 57.60, 58.40, 59.20, // 7.0 - 7.4
        60.00, 60.80, 61.60, 62.40, 63.20, // 7.5 - 7.9
        64.00, 64.80, 65.60, 66.40, 67.20, // 8.0 - 8.4
        68.00, 68.80, 69.60, 70.40, 71.20, // 8.5 - 8.9
        72.00, 72.80, 73.60, 74.40, 75.20, // 9.0 - 9.4
        76.00, 76.80, 77.60, 78.40, 79.20, // 9.5 - 9.9
        80.00, // 10.0
    ],
};

/// Cow chart (fat 3.0 - 6.0).
pub static COW_RATE_CHART: RateChart = RateChart {
    min_decile: 30,
    rates: &[
        25.30, 25.53, 25.76, 25.99, 26.22, // 3.0 - 3.4
        26.45, 26.68, 26.91, 27.14, 27.37, // 3.5 - 3.9
        27.60, 27.83, 28.06, 28.29, 28.52, // 4.0 - 4.4
        28.75, 28.98, 29.21, 29.44, 29.67, // 4.5 - 4.9
        29.90, 30.13, 30.36, 30.59, 30.82, // 5.0 - 5.4
        31.05, 31.28, 31.51, 31.74, 31.97, // 5.5 - 5.9
        32.20, // 6.0
    ],
};

/// Snap a fat reading to the nearest 0.1 and express it as a decile key.
pub fn quantize_fat(fat: f64) -> i64 {
    (fat * 10.0).round() as i64
}

/// Round a fat reading to one decimal for storage, so the stored fat and
/// the resolved rate stay mutually consistent on inspection.
pub fn round_fat(fat: f64) -> f64 {
    (fat * 10.0).round() / 10.0
}

/// Resolve the price per liter for a delivery on a specific date.
/// Returns None when the quantized fat falls outside the chart's domain;
/// callers must treat that as a validation failure, never as a zero rate.
pub fn find_rate_on(fat: f64, milk_type: MilkType, date: &str) -> Option<f64> {
    let key = quantize_fat(fat);
    match milk_type {
        MilkType::Cow => COW_RATE_CHART.get(key),
        MilkType::Buffalo => match Regime::for_date(date) {
            Regime::Legacy => BUFFALO_RATE_CHART_LEGACY.get(key),
            Regime::Effective2026 => BUFFALO_RATE_CHART_2026.get(key),
        },
    }
}

/// Resolve against today's regime when no date is given.
pub fn find_rate(fat: f64, milk_type: MilkType, date: Option<&str>) -> Option<f64> {
    match date {
        Some(d) => find_rate_on(fat, milk_type, d),
        None => find_rate_on(fat, milk_type, &clock::today()),
    }
}

/// Payment for a delivery: liters x rate, floored to whole rupees.
pub fn amount_for(liters: f64, rate: f64) -> i64 {
    (liters * rate).floor() as i64
}
