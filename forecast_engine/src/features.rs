//! Feature construction from a daily bar series.
//!
//! For every session `t` whose lookbacks are fully observed, one row is built
//! with the features, in this order:
//!
//! - `lag_1..=lag_k`: the close `k` sessions before `t`
//! - `ma_<w>` per configured window: mean close over `t-w+1..=t`
//! - optionally `returns` (`c[t] / c[t-1] - 1`, computed as a difference
//!   quotient) and `volatility` (sample standard deviation of the last
//!   `volatility_window` returns)
//!
//! Earlier sessions are dropped silently; nothing is imputed.

use std::ops::Range;

use chrono::NaiveDate;
use market_data_ingestor::models::bar_series::BarSeries;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::{
    config::{FeatureConfig, Target},
    errors::ForecastError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Session the features were observed at.
    pub date: NaiveDate,
    pub features: Vec<f64>,
}

/// Labeled design rows plus the unlabeled row of the newest bar.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub names: Vec<String>,
    pub rows: Vec<FeatureRow>,
    pub labels: Vec<f64>,
    /// Features at the most recent bar, the input of the final prediction.
    pub latest: FeatureRow,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Rows in `range` as an `len × feature_count` matrix.
    pub fn design_matrix(&self, range: Range<usize>) -> DMatrix<f64> {
        let rows = &self.rows[range];
        DMatrix::from_fn(rows.len(), self.feature_count(), |i, j| rows[i].features[j])
    }

    pub fn label_vector(&self, range: Range<usize>) -> DVector<f64> {
        DVector::from_column_slice(&self.labels[range])
    }
}

/// Feature names in column order.
pub fn feature_names(config: &FeatureConfig) -> Vec<String> {
    let mut names: Vec<String> = (1..=config.lags).map(|k| format!("lag_{k}")).collect();
    names.extend(config.ma_windows.iter().map(|w| format!("ma_{w}")));
    if config.include_returns_volatility {
        names.push("returns".to_string());
        names.push("volatility".to_string());
    }
    names
}

/// Index of the first session with every feature defined.
fn first_valid_index(config: &FeatureConfig) -> usize {
    let mut first = config.lags;
    if let Some(&widest) = config.ma_windows.iter().max() {
        first = first.max(widest.saturating_sub(1));
    }
    if config.include_returns_volatility {
        first = first.max(1).max(config.volatility_window);
    }
    first
}

fn returns(closes: &[f64]) -> Vec<f64> {
    // r[0] is undefined and never read
    let mut r = vec![f64::NAN; closes.len()];
    for t in 1..closes.len() {
        r[t] = (closes[t] - closes[t - 1]) / closes[t - 1];
    }
    r
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Standard deviation with an `n - 1` denominator.
fn sample_std(xs: &[f64]) -> f64 {
    let m = mean(xs);
    let ss: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    (ss / (xs.len() - 1) as f64).sqrt()
}

fn row_at(t: usize, closes: &[f64], rets: &[f64], config: &FeatureConfig) -> Vec<f64> {
    let mut row = Vec::with_capacity(config.lags + config.ma_windows.len() + 2);
    row.extend((1..=config.lags).map(|k| closes[t - k]));
    row.extend(
        config
            .ma_windows
            .iter()
            .map(|&w| mean(&closes[t + 1 - w..=t])),
    );
    if config.include_returns_volatility {
        row.push(rets[t]);
        let v = config.volatility_window;
        row.push(sample_std(&rets[t + 1 - v..=t]));
    }
    row
}

/// Builds the feature table for `series`.
///
/// The feature settings and the series are validated first. Fails with
/// [`ForecastError::InsufficientHistory`] when fewer than `config.min_rows`
/// labeled rows remain.
pub fn engineer(series: &BarSeries, config: &FeatureConfig) -> Result<FeatureTable, ForecastError> {
    config.validate()?;
    series.validate()?;

    let closes = series.closes();
    let n = closes.len();
    let first = first_valid_index(config);
    let min_rows = config.min_rows.max(1);

    if n <= first {
        return Err(ForecastError::InsufficientHistory { rows: 0, min_rows });
    }

    let rets = if config.include_returns_volatility {
        returns(&closes)
    } else {
        Vec::new()
    };

    let labeled_end = match config.target {
        Target::SameDay => n,
        Target::NextDay => n - 1,
    };

    let mut rows = Vec::with_capacity(labeled_end.saturating_sub(first));
    let mut labels = Vec::with_capacity(rows.capacity());
    for t in first..labeled_end {
        rows.push(FeatureRow {
            date: series.bars[t].date,
            features: row_at(t, &closes, &rets, config),
        });
        labels.push(match config.target {
            Target::SameDay => closes[t],
            Target::NextDay => closes[t + 1],
        });
    }

    if rows.len() < min_rows {
        return Err(ForecastError::InsufficientHistory {
            rows: rows.len(),
            min_rows,
        });
    }

    let latest = FeatureRow {
        date: series.bars[n - 1].date,
        features: row_at(n - 1, &closes, &rets, config),
    };
    let names = feature_names(config);

    debug!(
        symbol = %series.symbol,
        bars = n,
        rows = rows.len(),
        features = names.len(),
        "built feature table"
    );

    Ok(FeatureTable {
        names,
        rows,
        labels,
        latest,
    })
}
