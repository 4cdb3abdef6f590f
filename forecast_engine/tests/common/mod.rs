#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use market_data_ingestor::models::{bar::Bar, bar_series::BarSeries};

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

/// One bar per calendar day starting at [`start_date`].
pub fn series_from(symbol: &str, closes: &[f64]) -> BarSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar {
            date: start_date() + Days::new(i as u64),
            open: c * 0.995,
            high: c * 1.01,
            low: c * 0.99,
            close: c,
            volume: 1_000_000 + i as u64,
        })
        .collect();
    BarSeries::new(symbol, bars)
}

/// `close[t] = close[t-1] + 1`.
pub fn linear_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

/// Seeded random walk with up to ±1.5% daily moves.
///
/// Not generated by any linear recurrence, so a least-squares fit on it keeps a
/// real residual.
pub fn noisy_closes(n: usize) -> Vec<f64> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut close = 150.0;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let u = (state >> 11) as f64 / (1u64 << 53) as f64;
            close *= 1.0 + 0.03 * (u - 0.5);
            close
        })
        .collect()
}
