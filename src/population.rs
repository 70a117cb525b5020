//! The `Population` value type: N samples in d dimensions plus their
//! per-sample log-likelihood and log-target-density.

use nalgebra::{DMatrix, DVector};

use crate::error::{Result, TmcmcError};

/// An ordered collection of `N` `d`-dimensional samples with their
/// evaluator outputs.
///
/// `samples` is laid out with one sample per row (`N` rows, `d` columns),
/// matching invariant 1 of the data model: `|samples| = |log_likelihoods|
/// = |log_target| = N`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Population {
    samples: DMatrix<f64>,
    log_likelihoods: DVector<f64>,
    log_target: DVector<f64>,
}

impl Population {
    /// Build a population, checking the shape invariant.
    pub fn new(
        samples: DMatrix<f64>,
        log_likelihoods: DVector<f64>,
        log_target: DVector<f64>,
    ) -> Result<Self> {
        let n = samples.nrows();
        if log_likelihoods.len() != n || log_target.len() != n {
            return Err(TmcmcError::ShapeMismatch {
                detail: format!(
                    "samples has {} rows but log_likelihoods has {} and log_target has {}",
                    n,
                    log_likelihoods.len(),
                    log_target.len()
                ),
            });
        }
        Ok(Self {
            samples,
            log_likelihoods,
            log_target,
        })
    }

    /// Number of samples, `N`.
    pub fn len(&self) -> usize {
        self.samples.nrows()
    }

    /// `true` if the population holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.nrows() == 0
    }

    /// Dimensionality, `d`.
    pub fn dim(&self) -> usize {
        self.samples.ncols()
    }

    /// Sample matrix, `N` rows by `d` columns.
    pub fn samples(&self) -> &DMatrix<f64> {
        &self.samples
    }

    /// Per-sample log-likelihoods.
    pub fn log_likelihoods(&self) -> &DVector<f64> {
        &self.log_likelihoods
    }

    /// Per-sample log-target-density values.
    pub fn log_target(&self) -> &DVector<f64> {
        &self.log_target
    }
}
