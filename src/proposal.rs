//! The proposal builder: a scaled, weighted sample-covariance matrix and
//! its Cholesky factor, driving the Gaussian random-walk proposal inside
//! the rejuvenation engine. See `spec.md` §4.3.

use nalgebra::{Cholesky, DMatrix, DVector};

use crate::error::{Result, TmcmcError};

/// Weighted sample covariance, treating `weights` as per-row "aweights"
/// in the sense used by `numpy.cov(rowvar=False, aweights=w)`: an
/// unbiased estimate that corrects for the weights' own variance rather
/// than merely normalizing by `N`.
///
/// `weights` is assumed to already sum to 1 (as produced by
/// [`crate::weights::compute_weights`]), so the usual `numpy`
/// normalization factor `sum(w) - sum(w^2)/sum(w)` reduces to
/// `1 - sum(w^2)`.
pub fn weighted_covariance(samples: &DMatrix<f64>, weights: &DVector<f64>) -> DMatrix<f64> {
    let d = samples.ncols();
    let mean: DVector<f64> = {
        let mut m = DVector::zeros(d);
        for (row, &w) in samples.row_iter().zip(weights.iter()) {
            m += row.transpose() * w;
        }
        m
    };

    let sum_sq_weights: f64 = weights.iter().map(|w| w * w).sum();
    let correction = 1.0 - sum_sq_weights;

    let mut cov = DMatrix::<f64>::zeros(d, d);
    for (row, &w) in samples.row_iter().zip(weights.iter()) {
        let centered = row.transpose() - &mean;
        cov += (&centered * centered.transpose()) * w;
    }
    if correction > 0.0 {
        cov /= correction;
    }
    cov
}

/// Build `σ² · Cov_w(samples)` and return its lower Cholesky factor `L`,
/// with `L·Lᵀ = Σ`.
///
/// A non-positive-definite `Σ` (e.g. the weighted cloud does not span all
/// `d` dimensions, as when a single sample holds all the weight) is a
/// fatal stage error: `TmcmcError::NonPositiveDefinite`.
pub fn build_proposal(samples: &DMatrix<f64>, weights: &DVector<f64>, scale: f64) -> Result<DMatrix<f64>> {
    let sigma = weighted_covariance(samples, weights) * scale.powi(2);
    match Cholesky::new(sigma) {
        Some(chol) => Ok(chol.l()),
        None => Err(TmcmcError::NonPositiveDefinite(
            "weighted proposal covariance is not positive-definite".to_string(),
        )),
    }
}
