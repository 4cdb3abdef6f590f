use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default lookback used when only an end date is known (one calendar year).
pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;

/// Vendor-agnostic request for the daily bars of one symbol.
///
/// This is the standard input for all
/// [`DataProvider`](crate::providers::DataProvider) implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarsRequest {
    /// Symbol to request (e.g., `"AAPL"`).
    pub symbol: String,

    /// First trading day of the window (inclusive).
    pub start: NaiveDate,

    /// Last trading day of the window (inclusive).
    pub end: NaiveDate,
}

impl BarsRequest {
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
        }
    }

    /// The `lookback_days` calendar days ending at `end`.
    ///
    /// A lookback reaching past the earliest representable date starts there.
    pub fn trailing(symbol: impl Into<String>, end: NaiveDate, lookback_days: u32) -> Self {
        let start = end
            .checked_sub_days(Days::new(lookback_days.into()))
            .unwrap_or(NaiveDate::MIN);
        Self::new(symbol, start, end)
    }

    /// Whether `date` falls inside the request window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
