//! Next-session price forecasting over daily bars.
//!
//! A [`BarSeries`](market_data_ingestor::models::bar_series::BarSeries) goes in;
//! lagged and moving-average features are built, a least-squares model is fitted
//! and scored on chronologically held-out rows, and the newest bar's features
//! give a predicted close plus a BUY / SELL / HOLD signal.
//!
//! ```no_run
//! use forecast_engine::{config::ForecastConfig, forecast};
//! # fn series() -> market_data_ingestor::models::bar_series::BarSeries { unimplemented!() }
//!
//! let result = forecast(&series(), &ForecastConfig::default())?;
//! println!("{} -> {:.2} ({})", result.ticker, result.predicted_price, result.signal);
//! # Ok::<(), forecast_engine::ForecastError>(())
//! ```

pub mod config;
pub mod errors;
pub mod features;
pub mod history;
pub mod pipeline;
pub mod regressor;
pub mod report;
pub mod signal;
pub mod split;

pub use errors::{ConfigError, ForecastError};
pub use pipeline::{Forecast, forecast, run_forecast};
