//! JSON presentation of a [`Forecast`].
//!
//! Field names are camelCase and numbers are rounded for display: prices and
//! RMSE to 4 decimals, the percent change to 2.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{history::HistoryPoint, pipeline::Forecast, signal::Signal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub mode: String,
    pub folds: usize,
    pub fold_rmse: Vec<f64>,
    pub train_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub success: bool,
    pub ticker: String,
    pub as_of: NaiveDate,
    pub current_price: f64,
    pub predicted_price: f64,
    pub change_percent: f64,
    pub signal: Signal,
    pub rmse: f64,
    pub evaluation: EvaluationReport,
    pub history: Vec<HistoryPoint>,
    pub feature_count: usize,
    pub features: Vec<String>,
    pub model_type: String,
}

/// Body printed in place of a [`PredictionReport`] when a run fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}

impl ErrorReport {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

impl From<&Forecast> for PredictionReport {
    fn from(f: &Forecast) -> Self {
        Self {
            success: true,
            ticker: f.ticker.clone(),
            as_of: f.as_of,
            current_price: round_to(f.current_price, 4),
            predicted_price: round_to(f.predicted_price, 4),
            change_percent: round_to(f.change_percent, 2),
            signal: f.signal,
            rmse: round_to(f.rmse, 4),
            evaluation: EvaluationReport {
                mode: f.evaluation.mode.to_string(),
                folds: f.evaluation.fold_rmse.len(),
                fold_rmse: f.evaluation.fold_rmse.iter().map(|r| round_to(*r, 4)).collect(),
                train_rows: f.evaluation.train_rows,
            },
            history: f
                .history
                .iter()
                .map(|h| HistoryPoint {
                    date: h.date,
                    open: round_to(h.open, 4),
                    high: round_to(h.high, 4),
                    low: round_to(h.low, 4),
                    close: round_to(h.close, 4),
                    volume: h.volume,
                })
                .collect(),
            feature_count: f.feature_count,
            features: f.feature_names.clone(),
            model_type: f.model_type.to_string(),
        }
    }
}
