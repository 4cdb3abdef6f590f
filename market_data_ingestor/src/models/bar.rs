//! Canonical in-memory representation of one trading day (OHLCV).
//!
//! This struct is the standard output of every [`DataProvider`](crate::providers::DataProvider)
//! implementation, regardless of the vendor it came from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily bar.
///
/// Prices are expected to be positive finite numbers; that is checked when a
/// whole series is validated, see [`BarSeries::validate`](crate::models::bar_series::BarSeries::validate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading day of this bar. Unique within a series.
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the session.
    pub high: f64,

    /// Lowest price during the session.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Shares traded during the session.
    pub volume: u64,
}

impl Bar {
    /// Builds a bar where open, high, low and close all equal `close`.
    ///
    /// Handy for synthetic series where only the close matters.
    pub fn flat(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }
}
