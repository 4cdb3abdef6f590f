//! Offline provider backed by a JSON array of bars on disk.
//!
//! The file holds the [`Bar`] shape directly:
//!
//! ```json
//! [
//!   {"date": "2024-01-02", "open": 187.15, "high": 188.44, "low": 183.88, "close": 185.64, "volume": 82488674}
//! ]
//! ```
//!
//! Bars outside the request window are skipped. Order is kept as written, so a
//! badly ordered file surfaces later as a validation error instead of being
//! silently sorted.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::{bar::Bar, bar_series::BarSeries, request_params::BarsRequest},
    providers::{DataProvider, DecodeSnafu, IoSnafu, NoDataSnafu, ProviderError, validate_request},
};

pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataProvider for JsonFileProvider {
    async fn fetch_daily_bars(&self, request: &BarsRequest) -> Result<BarSeries, ProviderError> {
        validate_request(request)?;

        let raw = tokio::fs::read(&self.path)
            .await
            .context(IoSnafu { path: &self.path })?;
        let all: Vec<Bar> =
            serde_json::from_slice(&raw).context(DecodeSnafu { path: &self.path })?;
        let total = all.len();

        let bars: Vec<Bar> = all
            .into_iter()
            .filter(|bar| request.contains(bar.date))
            .collect();
        debug!(
            path = %self.path.display(),
            total,
            in_window = bars.len(),
            "loaded bars from file"
        );

        if bars.is_empty() {
            return NoDataSnafu {
                symbol: request.symbol.clone(),
            }
            .fail();
        }

        Ok(BarSeries::new(request.symbol.clone(), bars))
    }
}
