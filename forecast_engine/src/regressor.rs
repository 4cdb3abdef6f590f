//! Regression strategies.
//!
//! [`Regressor`] is the seam between the pipeline and a concrete model. The
//! only implementor here is [`NormalEquation`], ordinary least squares solved
//! in closed form:
//!
//! ```text
//! Xb = [1 | X]
//! θ  = pinv(Xbᵀ Xb) · Xbᵀ · y
//! ```
//!
//! The pseudo-inverse is taken through an SVD with a relative cutoff, so
//! perfectly collinear inputs (lags and moving averages of a trending series
//! are, very nearly) still produce the minimum-norm least-squares solution
//! instead of failing.

use nalgebra::{DMatrix, DVector};

use crate::{config::PredictionConfig, errors::ForecastError};

/// Singular values at or below `rcond * σ_max` are treated as zero.
pub const DEFAULT_RCOND: f64 = 1e-12;
pub const DEFAULT_MAX_SVD_ITERATIONS: usize = 10_000;

pub trait Regressor {
    /// Fitted state produced by [`Regressor::fit`].
    type Params;

    /// Name reported next to the prediction.
    fn model_type(&self) -> &'static str;

    fn fit(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<Self::Params, ForecastError>;

    /// Predicts one row of raw features.
    fn predict(&self, params: &Self::Params, x: &[f64]) -> Result<f64, ForecastError>;

    /// Root mean squared error of [`Regressor::predict`] over the rows of `x`.
    fn evaluate(
        &self,
        params: &Self::Params,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
    ) -> Result<f64, ForecastError> {
        if x.nrows() != y.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(ForecastError::DegenerateFit(
                "evaluation set is empty".to_string(),
            ));
        }
        let predicted = x
            .row_iter()
            .map(|row| {
                let features: Vec<f64> = row.iter().copied().collect();
                self.predict(params, &features)
            })
            .collect::<Result<Vec<f64>, _>>()?;
        Ok(rmse(&predicted, y.as_slice()))
    }
}

/// `sqrt(mean((p - a)²))`. Callers guarantee equal, non-zero lengths.
pub fn rmse(predicted: &[f64], actual: &[f64]) -> f64 {
    let mse = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).powi(2))
        .sum::<f64>()
        / predicted.len() as f64;
    mse.sqrt()
}

/// Coefficients `[bias, w_1..w_k]` of a linear fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Theta(DVector<f64>);

impl Theta {
    pub fn intercept(&self) -> f64 {
        self.0[0]
    }

    pub fn weights(&self) -> &[f64] {
        &self.0.as_slice()[1..]
    }

    /// Number of coefficients, bias included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ordinary least squares through the normal equation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalEquation {
    pub clamp_non_negative: bool,
    pub rcond: f64,
    pub max_svd_iterations: usize,
}

impl Default for NormalEquation {
    fn default() -> Self {
        Self {
            clamp_non_negative: true,
            rcond: DEFAULT_RCOND,
            max_svd_iterations: DEFAULT_MAX_SVD_ITERATIONS,
        }
    }
}

impl From<&PredictionConfig> for NormalEquation {
    fn from(cfg: &PredictionConfig) -> Self {
        Self {
            clamp_non_negative: cfg.clamp_non_negative,
            ..Default::default()
        }
    }
}

/// Moore-Penrose pseudo-inverse with a cutoff relative to the largest singular value.
pub fn pseudo_inverse(
    m: DMatrix<f64>,
    rcond: f64,
    max_iterations: usize,
) -> Result<DMatrix<f64>, ForecastError> {
    let svd = m
        .try_svd(true, true, f64::EPSILON, max_iterations)
        .ok_or_else(|| {
            ForecastError::DegenerateFit(format!(
                "SVD did not converge within {max_iterations} iterations"
            ))
        })?;
    let sigma_max = svd.singular_values.max();
    if !sigma_max.is_finite() {
        return Err(ForecastError::DegenerateFit(
            "non-finite singular value".to_string(),
        ));
    }
    svd.pseudo_inverse(rcond * sigma_max)
        .map_err(|e| ForecastError::DegenerateFit(e.to_string()))
}

impl Regressor for NormalEquation {
    type Params = Theta;

    fn model_type(&self) -> &'static str {
        "LinearRegression"
    }

    fn fit(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<Theta, ForecastError> {
        if x.nrows() != y.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(ForecastError::DegenerateFit(
                "training set is empty".to_string(),
            ));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(ForecastError::DegenerateFit(
                "training data contains non-finite values".to_string(),
            ));
        }

        let xb = x.clone().insert_column(0, 1.0);
        let xt = xb.transpose();
        let xtx_pinv = pseudo_inverse(&xt * &xb, self.rcond, self.max_svd_iterations)?;
        let theta = xtx_pinv * (xt * y);

        if theta.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::DegenerateFit(
                "coefficients are not finite".to_string(),
            ));
        }
        Ok(Theta(theta))
    }

    fn predict(&self, params: &Theta, x: &[f64]) -> Result<f64, ForecastError> {
        let weights = params.weights();
        if x.len() != weights.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: weights.len(),
                got: x.len(),
            });
        }
        let raw = params.intercept() + weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>();
        Ok(if self.clamp_non_negative {
            raw.max(0.0)
        } else {
            raw
        })
    }
}
