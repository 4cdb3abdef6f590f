//! End-to-end forecast for one bar series.
//!
//! Steps, in order:
//! 1. engineer the feature table ([`features::engineer`])
//! 2. lay out partitions for the configured split ([`split::partitions`])
//! 3. fit on each training range and score on its evaluation range
//! 4. refit on the whole table and predict from the newest bar's features
//! 5. derive the signal and cut the charting window
//!
//! A run holds no state; the same series and config always give the same result.

use chrono::NaiveDate;
use market_data_ingestor::models::bar_series::BarSeries;
use tracing::{debug, info, warn};

use crate::{
    config::ForecastConfig,
    errors::ForecastError,
    features,
    history::{self, HistoryPoint},
    regressor::{NormalEquation, Regressor},
    signal::{self, Signal},
    split,
};

/// How the error estimate was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// `in_sample`, `holdout` or `walk_forward`.
    pub mode: &'static str,
    /// One RMSE per partition; the reported error is their mean.
    pub fold_rmse: Vec<f64>,
    /// Rows of the feature table the final model was fitted on.
    pub train_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub ticker: String,
    /// Date of the newest bar.
    pub as_of: NaiveDate,
    pub current_price: f64,
    pub predicted_price: f64,
    pub change_percent: f64,
    pub signal: Signal,
    pub rmse: f64,
    pub evaluation: Evaluation,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub model_type: &'static str,
    pub history: Vec<HistoryPoint>,
}

/// Runs the pipeline with ordinary least squares configured from `config.prediction`.
pub fn forecast(series: &BarSeries, config: &ForecastConfig) -> Result<Forecast, ForecastError> {
    run_forecast(series, config, &NormalEquation::from(&config.prediction))
}

/// Runs the pipeline with any [`Regressor`].
///
/// `config` is validated first, so hand-built configs fail with
/// [`ForecastError::Config`] like parsed ones do.
pub fn run_forecast<R: Regressor>(
    series: &BarSeries,
    config: &ForecastConfig,
    regressor: &R,
) -> Result<Forecast, ForecastError> {
    config.validate()?;
    if config.features.label_in_features() {
        warn!(
            ticker = %series.symbol,
            model = regressor.model_type(),
            "same-day label is contained in a moving-average feature; \
             the prediction will track the current close"
        );
    }

    let table = features::engineer(series, &config.features)?;
    let parts = split::partitions(&config.split, table.len())?;

    let mut fold_rmse = Vec::with_capacity(parts.len());
    for (fold, part) in parts.iter().enumerate() {
        let params = regressor.fit(
            &table.design_matrix(part.train.clone()),
            &table.label_vector(part.train.clone()),
        )?;
        let score = regressor.evaluate(
            &params,
            &table.design_matrix(part.test.clone()),
            &table.label_vector(part.test.clone()),
        )?;
        debug!(
            fold,
            train = part.train.len(),
            test = part.test.len(),
            rmse = score,
            "scored partition"
        );
        fold_rmse.push(score);
    }
    let rmse = fold_rmse.iter().sum::<f64>() / fold_rmse.len() as f64;

    let all = 0..table.len();
    let params = regressor.fit(&table.design_matrix(all.clone()), &table.label_vector(all))?;
    let predicted_price = regressor.predict(&params, &table.latest.features)?;

    let current_price = series
        .latest_close()
        .ok_or(ForecastError::InsufficientHistory {
            rows: 0,
            min_rows: config.features.min_rows,
        })?;
    let change_percent = signal::change_percent(current_price, predicted_price);
    let signal = signal::generate_signal(current_price, predicted_price, &config.signal);

    info!(
        ticker = %series.symbol,
        as_of = %table.latest.date,
        current_price,
        predicted_price,
        rmse,
        %signal,
        mode = config.split.label(),
        "forecast complete"
    );

    Ok(Forecast {
        ticker: series.symbol.clone(),
        as_of: table.latest.date,
        current_price,
        predicted_price,
        change_percent,
        signal,
        rmse,
        evaluation: Evaluation {
            mode: config.split.label(),
            fold_rmse,
            train_rows: table.len(),
        },
        feature_count: table.feature_count(),
        feature_names: table.names.clone(),
        model_type: regressor.model_type(),
        history: history::recent_history(series, config.history.months),
    })
}
