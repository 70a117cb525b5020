//! The weight kernel: numerically stable importance weights and
//! log-evidence increments from a vector of log-likelihoods and a β
//! increment. See `spec.md` §4.1.

use nalgebra::DVector;

use crate::error::{Result, TmcmcError};

/// Numerically stable `log(sum(exp(x)))`, subtracting the row max before
/// exponentiating (Design Note: "every exponentiation of log-quantities
/// must subtract a row-max first").
pub fn log_sum_exp(x: &DVector<f64>) -> f64 {
    let max = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        // every entry is -inf (or NaN propagated through a prior max); the
        // sum is -inf, not NaN.
        return max;
    }
    let sum: f64 = x.iter().map(|&xi| (xi - max).exp()).sum();
    max + sum.ln()
}

/// Normalized importance weights and this stage's log-evidence increment.
pub struct WeightResult {
    /// Self-normalized weights, summing to 1.
    pub weights: DVector<f64>,
    /// `logsumexp(beta_increment * log_likelihoods) - log(N)`.
    pub log_evidence_increment: f64,
}

/// Compute self-normalized importance weights and the log-evidence
/// increment for a β increment, per `spec.md` §4.1.
///
/// Returns `TmcmcError::DegenerateWeights` when every log-likelihood is
/// non-finite, since no sample can then receive positive weight.
pub fn compute_weights(beta_increment: f64, log_likelihoods: &DVector<f64>) -> Result<WeightResult> {
    let n = log_likelihoods.len();
    let x = log_likelihoods.map(|ll| beta_increment * ll);

    let lse = log_sum_exp(&x);
    if !lse.is_finite() {
        return Err(TmcmcError::DegenerateWeights);
    }

    let max = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let shifted = x.map(|xi| (xi - max).exp());
    let sum: f64 = shifted.iter().sum();
    if !(sum.is_finite() && sum > 0.0) {
        return Err(TmcmcError::DegenerateWeights);
    }

    let weights = shifted.map(|w| w / sum);
    let log_evidence_increment = lse - (n as f64).ln();

    Ok(WeightResult {
        weights,
        log_evidence_increment,
    })
}

/// Coefficient of variation (stddev / mean) of a weight vector. NaN
/// stddev or mean is treated as `+inf`, per `spec.md` §4.2's tie-break
/// rule, so infeasible stepper brackets compare consistently.
pub fn coefficient_of_variation(weights: &DVector<f64>) -> f64 {
    let n = weights.len() as f64;
    let mean = weights.sum() / n;
    let variance = weights.iter().map(|&w| (w - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();
    let cov = std / mean;
    if cov.is_nan() {
        f64::INFINITY
    } else {
        cov
    }
}
