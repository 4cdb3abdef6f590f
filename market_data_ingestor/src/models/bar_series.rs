//! A chronologically ordered collection of daily bars for one symbol.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::bar::Bar;

/// A bar that breaks the series invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidBarError {
    /// Close is zero, negative, NaN or infinite.
    #[error("bar {index} ({date}): close must be a positive finite number, got {close}")]
    NonPositiveClose {
        index: usize,
        date: NaiveDate,
        close: f64,
    },

    /// Date is equal to or earlier than the previous bar's date.
    #[error("bar {index} ({date}) is not after the previous bar ({previous})")]
    NotAscending {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },
}

/// Daily bars for a single symbol, oldest first.
///
/// Weekends and holidays are naturally absent; no gap filling is done.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "AAPL").
    pub symbol: String,
    /// The bars, ascending by date.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Close prices in series order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.last().map(|b| b.close)
    }

    /// Checks that every close is positive and finite and that dates strictly increase.
    ///
    /// Returns the first offending bar. Nothing is sorted or repaired.
    pub fn validate(&self) -> Result<(), InvalidBarError> {
        let mut previous: Option<NaiveDate> = None;
        for (index, bar) in self.bars.iter().enumerate() {
            if !(bar.close.is_finite() && bar.close > 0.0) {
                return Err(InvalidBarError::NonPositiveClose {
                    index,
                    date: bar.date,
                    close: bar.close,
                });
            }
            if let Some(prev) = previous {
                if bar.date <= prev {
                    return Err(InvalidBarError::NotAscending {
                        index,
                        date: bar.date,
                        previous: prev,
                    });
                }
            }
            previous = Some(bar.date);
        }
        Ok(())
    }
}
