//! Chronological train/evaluation partitioning.
//!
//! Every policy keeps time order: a training range always ends at or before the
//! start of its evaluation range, so no future row leaks into a fit. Shuffled
//! splits are deliberately absent.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::errors::ForecastError;

pub const DEFAULT_SPLIT_RATIO: f64 = 0.8;
pub const DEFAULT_FOLDS: usize = 5;

fn default_split_ratio() -> f64 {
    DEFAULT_SPLIT_RATIO
}

fn default_folds() -> usize {
    DEFAULT_FOLDS
}

/// How the feature table is divided for error estimation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SplitMode {
    /// Fit and score on the same rows. Optimistic; kept for comparison only.
    InSample,
    /// First `⌊n·split_ratio⌋` rows train, the rest score.
    Holdout {
        #[serde(default = "default_split_ratio")]
        split_ratio: f64,
    },
    /// Expanding-window folds over the tail of the table.
    WalkForward {
        #[serde(default = "default_folds")]
        folds: usize,
    },
}

impl Default for SplitMode {
    fn default() -> Self {
        SplitMode::Holdout {
            split_ratio: DEFAULT_SPLIT_RATIO,
        }
    }
}

impl SplitMode {
    /// Label reported alongside the error estimate.
    pub fn label(&self) -> &'static str {
        match self {
            SplitMode::InSample => "in_sample",
            SplitMode::Holdout { .. } => "holdout",
            SplitMode::WalkForward { .. } => "walk_forward",
        }
    }
}

/// One fit/score pair of row ranges into the feature table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train: Range<usize>,
    pub test: Range<usize>,
}

/// Lays out the partitions for a table of `n` rows.
///
/// Walk-forward follows the usual expanding-window layout: with
/// `test_size = n / (folds + 1)`, the test blocks tile the last
/// `folds * test_size` rows and each fold trains on everything before its block.
pub fn partitions(mode: &SplitMode, n: usize) -> Result<Vec<Partition>, ForecastError> {
    match *mode {
        SplitMode::InSample => {
            if n == 0 {
                return Err(ForecastError::InsufficientHistory { rows: 0, min_rows: 1 });
            }
            Ok(vec![Partition {
                train: 0..n,
                test: 0..n,
            }])
        }
        SplitMode::Holdout { split_ratio } => {
            let idx = (n as f64 * split_ratio).floor() as usize;
            if idx == 0 || idx >= n {
                return Err(ForecastError::InsufficientHistory { rows: n, min_rows: 2 });
            }
            Ok(vec![Partition {
                train: 0..idx,
                test: idx..n,
            }])
        }
        SplitMode::WalkForward { folds } => {
            let test_size = n / (folds + 1);
            if folds == 0 || test_size == 0 {
                return Err(ForecastError::InsufficientHistory {
                    rows: n,
                    min_rows: folds + 1,
                });
            }
            let first_test = n - folds * test_size;
            Ok((0..folds)
                .map(|fold| {
                    let start = first_test + fold * test_size;
                    Partition {
                        train: 0..start,
                        test: start..start + test_size,
                    }
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_sample_scores_on_training_rows() {
        let parts = partitions(&SplitMode::InSample, 40).unwrap();
        assert_eq!(
            parts,
            vec![Partition {
                train: 0..40,
                test: 0..40
            }]
        );
    }

    #[test]
    fn holdout_splits_at_floor_of_ratio() {
        let parts = partitions(&SplitMode::Holdout { split_ratio: 0.8 }, 243).unwrap();
        // 243 * 0.8 = 194.4
        assert_eq!(
            parts,
            vec![Partition {
                train: 0..194,
                test: 194..243
            }]
        );
    }

    #[test]
    fn holdout_needs_both_sides() {
        let err = partitions(&SplitMode::Holdout { split_ratio: 0.8 }, 1).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientHistory { rows: 1, .. }));
    }

    #[test]
    fn walk_forward_matches_expanding_window_layout() {
        // 23 rows, 5 folds: test_size = 3, tests cover rows 8..23
        let parts = partitions(&SplitMode::WalkForward { folds: 5 }, 23).unwrap();
        let expected: Vec<Partition> = [8, 11, 14, 17, 20]
            .into_iter()
            .map(|s| Partition {
                train: 0..s,
                test: s..s + 3,
            })
            .collect();
        assert_eq!(parts, expected);
    }

    #[test]
    fn walk_forward_needs_a_row_per_block() {
        let err = partitions(&SplitMode::WalkForward { folds: 5 }, 5).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientHistory { rows: 5, min_rows: 6 }
        ));
    }

    #[test]
    fn training_never_overlaps_the_future() {
        for mode in [
            SplitMode::Holdout { split_ratio: 0.7 },
            SplitMode::WalkForward { folds: 4 },
        ] {
            for n in 10..60 {
                for p in partitions(&mode, n).unwrap() {
                    assert!(!p.train.is_empty());
                    assert!(!p.test.is_empty());
                    assert!(p.train.end <= p.test.start);
                    assert!(p.test.end <= n);
                }
            }
        }
    }

    #[test]
    fn labels() {
        assert_eq!(SplitMode::InSample.label(), "in_sample");
        assert_eq!(SplitMode::default().label(), "holdout");
        assert_eq!(SplitMode::WalkForward { folds: 3 }.label(), "walk_forward");
    }
}
