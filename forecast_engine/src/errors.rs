use std::path::PathBuf;

use market_data_ingestor::models::bar_series::InvalidBarError;
use thiserror::Error;

/// Everything that can stop a single forecast run.
///
/// All variants are terminal for the invocation; nothing is retried internally.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Too few bars survive feature construction to fit and evaluate a model.
    #[error("insufficient history: {rows} usable rows, at least {min_rows} required")]
    InsufficientHistory { rows: usize, min_rows: usize },

    /// The regression could not produce usable coefficients or scores.
    #[error("degenerate fit: {0}")]
    DegenerateFit(String),

    #[error("invalid bar series: {0}")]
    InvalidBar(#[from] InvalidBarError),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or checking a [`ForecastConfig`](crate::config::ForecastConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
