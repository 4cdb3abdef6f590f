//! Run configuration for the forecaster.
//!
//! Everything is read from a single TOML document whose sections map onto the
//! pipeline stages. Every key is optional; a missing section or key falls back
//! to the defaults below: five lags, 5- and 10-day moving averages, the next
//! session's close as the label, 80/20 holdout, ±2% signal band and six months
//! of history.
//!
//! ```toml
//! [features]
//! lags = 5
//! ma_windows = [5, 10]
//! include_returns_volatility = false
//! volatility_window = 5
//! target = "next_day"
//! min_rows = 30
//!
//! [split]
//! mode = "holdout"
//! split_ratio = 0.8
//!
//! [signal]
//! buy_threshold = 2.0
//! sell_threshold = -2.0
//!
//! [prediction]
//! clamp_non_negative = true
//!
//! [history]
//! months = 6
//! ```
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`ForecastConfig::from_toml_str`]
//! - Parse + validate from a file path: [`ForecastConfig::from_path`]

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{errors::ConfigError, signal::SignalThresholds, split::SplitMode};

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    pub features: FeatureConfig,
    pub split: SplitMode,
    pub signal: SignalThresholds,
    pub prediction: PredictionConfig,
    pub history: HistoryConfig,
}

/// Which close a feature row is asked to explain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The close of the row's own session. Any moving average with
    /// `w <= lags + 1` contains this close, so the label is a linear
    /// combination of the features.
    SameDay,
    /// The close of the following session; the newest bar has no label.
    #[default]
    NextDay,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureConfig {
    /// Number of lagged closes, `lag_1..=lag_k`.
    pub lags: usize,
    /// Trailing moving-average windows, one `ma_<w>` feature each.
    pub ma_windows: Vec<usize>,
    /// Adds `returns` and `volatility`.
    pub include_returns_volatility: bool,
    /// Sessions in the rolling standard deviation of returns.
    pub volatility_window: usize,
    pub target: Target,
    /// Minimum number of labeled rows required to fit.
    pub min_rows: usize,
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lags == 0 && self.ma_windows.is_empty() {
            return invalid("features: need at least one lag or moving-average window");
        }
        if self.ma_windows.contains(&0) {
            return invalid("features.ma_windows: window must be at least 1");
        }
        if self.include_returns_volatility && self.volatility_window < 2 {
            return invalid("features.volatility_window: must be at least 2");
        }
        if self.min_rows == 0 {
            return invalid("features.min_rows: must be at least 1");
        }
        Ok(())
    }

    /// Whether a same-day label can be rebuilt exactly from the features.
    ///
    /// `close[t] = w * ma_w - (lag_1 + .. + lag_{w-1})` whenever `w <= lags + 1`,
    /// so a linear model reproduces the current close and scores a near-zero error.
    pub fn label_in_features(&self) -> bool {
        self.target == Target::SameDay && self.ma_windows.iter().any(|&w| w <= self.lags + 1)
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            lags: 5,
            ma_windows: vec![5, 10],
            include_returns_volatility: false,
            volatility_window: 5,
            target: Target::NextDay,
            min_rows: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictionConfig {
    /// Floors predicted prices at zero.
    pub clamp_non_negative: bool,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            clamp_non_negative: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Calendar months of bars returned for charting.
    pub months: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { months: 6 }
    }
}

impl ForecastConfig {
    /// Parse a config from a TOML string and validate it.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let cfg: ForecastConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a config file from disk, parse, and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.features.validate()?;

        match self.split {
            SplitMode::InSample => {}
            SplitMode::Holdout { split_ratio } => {
                if !(split_ratio > 0.0 && split_ratio < 1.0) {
                    return invalid(format!(
                        "split.split_ratio: must be strictly between 0 and 1, got {split_ratio}"
                    ));
                }
            }
            SplitMode::WalkForward { folds } => {
                if folds < 2 {
                    return invalid(format!("split.folds: must be at least 2, got {folds}"));
                }
            }
        }

        let s = &self.signal;
        if !(s.buy_threshold.is_finite() && s.sell_threshold.is_finite()) {
            return invalid("signal: thresholds must be finite");
        }
        if s.buy_threshold <= s.sell_threshold {
            return invalid(format!(
                "signal: buy_threshold ({}) must be greater than sell_threshold ({})",
                s.buy_threshold, s.sell_threshold
            ));
        }

        if self.history.months == 0 {
            return invalid("history.months: must be at least 1");
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(msg.into()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = ForecastConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, ForecastConfig::default());
        assert_eq!(cfg.features.lags, 5);
        assert_eq!(cfg.features.ma_windows, vec![5, 10]);
        assert_eq!(cfg.features.target, Target::NextDay);
        assert_eq!(cfg.split, SplitMode::Holdout { split_ratio: 0.8 });
        assert_eq!(cfg.signal.buy_threshold, 2.0);
        assert_eq!(cfg.signal.sell_threshold, -2.0);
        assert!(cfg.prediction.clamp_non_negative);
        assert_eq!(cfg.history.months, 6);
    }

    #[test]
    fn parses_every_section() {
        let toml_str = r#"
            [features]
            lags = 3
            ma_windows = [20]
            include_returns_volatility = true
            volatility_window = 10
            target = "same_day"
            min_rows = 50

            [split]
            mode = "walk_forward"
            folds = 4

            [signal]
            buy_threshold = 1.5
            sell_threshold = -3.0

            [prediction]
            clamp_non_negative = false

            [history]
            months = 3
        "#;
        let cfg = ForecastConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(cfg.features.lags, 3);
        assert_eq!(cfg.features.ma_windows, vec![20]);
        assert!(cfg.features.include_returns_volatility);
        assert_eq!(cfg.features.volatility_window, 10);
        assert_eq!(cfg.features.target, Target::SameDay);
        assert_eq!(cfg.features.min_rows, 50);
        assert_eq!(cfg.split, SplitMode::WalkForward { folds: 4 });
        assert_eq!(cfg.signal.buy_threshold, 1.5);
        assert!(!cfg.prediction.clamp_non_negative);
        assert_eq!(cfg.history.months, 3);
    }

    #[test]
    fn split_keys_default_within_mode() {
        let cfg = ForecastConfig::from_toml_str("[split]\nmode = \"holdout\"").unwrap();
        assert_eq!(cfg.split, SplitMode::Holdout { split_ratio: 0.8 });

        let cfg = ForecastConfig::from_toml_str("[split]\nmode = \"walk_forward\"").unwrap();
        assert_eq!(cfg.split, SplitMode::WalkForward { folds: 5 });

        let cfg = ForecastConfig::from_toml_str("[split]\nmode = \"in_sample\"").unwrap();
        assert_eq!(cfg.split, SplitMode::InSample);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ForecastConfig::from_toml_str("[features]\nlagz = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = ForecastConfig::from_toml_str("[model]\nkind = \"forest\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            "[features]\nlags = 0\nma_windows = []",
            "[features]\nma_windows = [0, 5]",
            "[features]\ninclude_returns_volatility = true\nvolatility_window = 1",
            "[features]\nmin_rows = 0",
            "[split]\nmode = \"holdout\"\nsplit_ratio = 1.0",
            "[split]\nmode = \"holdout\"\nsplit_ratio = 0.0",
            "[split]\nmode = \"walk_forward\"\nfolds = 1",
            "[signal]\nbuy_threshold = -2.0\nsell_threshold = -2.0",
            "[history]\nmonths = 0",
        ];
        for case in cases {
            let err = ForecastConfig::from_toml_str(case).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid(_)),
                "expected Invalid for {case:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn lags_only_or_ma_only_is_fine() {
        assert!(ForecastConfig::from_toml_str("[features]\nlags = 0").is_ok());
        assert!(ForecastConfig::from_toml_str("[features]\nma_windows = []").is_ok());
    }

    #[test]
    fn same_day_label_inside_moving_average_is_detected() {
        let defaults = FeatureConfig::default();
        assert!(!defaults.label_in_features());

        let same_day = FeatureConfig {
            target: Target::SameDay,
            ..Default::default()
        };
        assert!(same_day.label_in_features());

        // ma_10 alone needs lag_9 to be rebuilt
        let wide_only = FeatureConfig {
            target: Target::SameDay,
            ma_windows: vec![10],
            ..Default::default()
        };
        assert!(!wide_only.label_in_features());
    }

    #[test]
    fn feature_section_validates_on_its_own() {
        let cfg = FeatureConfig {
            include_returns_volatility: true,
            volatility_window: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
        assert!(FeatureConfig::default().validate().is_ok());
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[signal]\nbuy_threshold = 5.0").unwrap();
        file.flush().unwrap();

        let cfg = ForecastConfig::from_path(file.path()).unwrap();
        assert_eq!(cfg.signal.buy_threshold, 5.0);
        assert_eq!(cfg.signal.sell_threshold, -2.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ForecastConfig::from_path(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
