use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::bar::Bar;

#[derive(Deserialize, Debug)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: u64,
}

/// One page of `GET /v2/stocks/{symbol}/bars`.
#[derive(Deserialize, Debug)]
pub struct AlpacaResponse {
    /// `null` when the window holds no bars.
    #[serde(default)]
    pub bars: Option<Vec<AlpacaBar>>,
    pub symbol: String,
    pub next_page_token: Option<String>,
}

impl From<AlpacaBar> for Bar {
    fn from(ab: AlpacaBar) -> Self {
        // daily bars are stamped at midnight New York time, which is still the same UTC date
        Bar {
            date: ab.timestamp.date_naive(),
            open: ab.open,
            high: ab.high,
            low: ab.low,
            close: ab.close,
            volume: ab.volume,
        }
    }
}
