//! BUY / SELL / HOLD from the predicted move against the last close.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        };
        f.write_str(s)
    }
}

/// Percent-change band around the current close. Both bounds are exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalThresholds {
    pub buy_threshold: f64,
    pub sell_threshold: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            buy_threshold: 2.0,
            sell_threshold: -2.0,
        }
    }
}

/// `(predicted - current) / current * 100`.
///
/// `current` must be positive; validated bar series guarantee that.
pub fn change_percent(current: f64, predicted: f64) -> f64 {
    (predicted - current) / current * 100.0
}

pub fn generate_signal(current: f64, predicted: f64, thresholds: &SignalThresholds) -> Signal {
    let change = change_percent(current, predicted);
    if change > thresholds.buy_threshold {
        Signal::Buy
    } else if change < thresholds.sell_threshold {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
