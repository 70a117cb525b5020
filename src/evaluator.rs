//! The two user-supplied capabilities the core consumes: a log-likelihood
//! and a log-target-density evaluator. This is the Rust re-expression of
//! the reference implementation's two callables; see `spec.md` §6 and
//! Design Note "Callable evaluators".
//!
//! The core only ever calls these in two patterns: batch, over the whole
//! population (stage entry), and row, for a single proposed point inside
//! the Metropolis-Hastings loop.

use nalgebra::{DMatrix, DVector};

/// Evaluates the log-likelihood of one or many points.
///
/// `row` must be finite for within-support points and may return `-inf`
/// for out-of-support points. Implementations that wrap an evaluator
/// whose native output is a vector (e.g. an FFI surrogate) are
/// responsible for validating that output has exactly one element before
/// calling `row`; use `TmcmcError::invalid_evaluator_output` to signal a
/// violation the way the reference implementation does.
pub trait LogLikelihood: Sync {
    /// Evaluate the log-likelihood at every row of `samples` (`N` rows).
    fn batch(&self, samples: &DMatrix<f64>) -> DVector<f64>;

    /// Evaluate the log-likelihood at a single `d`-dimensional point.
    fn row(&self, sample: &[f64]) -> f64;
}

/// Evaluates the (already tempered) log-target-density at a single point,
/// given its precomputed log-likelihood (so implementations can avoid
/// recomputing it).
pub trait LogTargetDensity: Sync {
    /// Evaluate the log-target-density at `sample`, whose log-likelihood
    /// is `log_likelihood`.
    fn row(&self, sample: &[f64], log_likelihood: f64) -> f64;
}

/// Blanket support for plain closures, so callers are not forced to name
/// a type purely to implement a one-method trait.
impl<F> LogLikelihood for F
where
    F: Sync + Fn(&DMatrix<f64>) -> DVector<f64> + RowLogLikelihood,
{
    fn batch(&self, samples: &DMatrix<f64>) -> DVector<f64> {
        self(samples)
    }

    fn row(&self, sample: &[f64]) -> f64 {
        RowLogLikelihood::row(self, sample)
    }
}

/// Helper trait used only to let the blanket closure impl above compute a
/// row-mode evaluation from a batch-mode closure (a 1×d call).
pub trait RowLogLikelihood {
    /// Evaluate a single row by wrapping it into a 1×d batch call.
    fn row(&self, sample: &[f64]) -> f64;
}

impl<F> RowLogLikelihood for F
where
    F: Fn(&DMatrix<f64>) -> DVector<f64>,
{
    fn row(&self, sample: &[f64]) -> f64 {
        let m = DMatrix::from_row_slice(1, sample.len(), sample);
        self(&m)[0]
    }
}

/// Bundles the two evaluators the driver and rejuvenation engine need.
pub struct Evaluators<'a> {
    /// Log-likelihood evaluator.
    pub log_likelihood: &'a dyn LogLikelihood,
    /// Log-target-density evaluator.
    pub log_target_density: &'a dyn LogTargetDensity,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GaussianAt10;
    impl LogLikelihood for GaussianAt10 {
        fn batch(&self, samples: &DMatrix<f64>) -> DVector<f64> {
            DVector::from_iterator(
                samples.nrows(),
                samples
                    .row_iter()
                    .map(|r| -0.5 * r.iter().map(|x| (x - 10.0).powi(2)).sum::<f64>()),
            )
        }

        fn row(&self, sample: &[f64]) -> f64 {
            -0.5 * sample.iter().map(|x| (x - 10.0).powi(2)).sum::<f64>()
        }
    }

    #[test]
    fn row_and_batch_agree() {
        let ll = GaussianAt10;
        let samples = DMatrix::from_row_slice(2, 2, &[10.0, 10.0, 0.0, 0.0]);
        let batch = ll.batch(&samples);
        assert_eq!(batch[0], ll.row(&[10.0, 10.0]));
        assert_eq!(batch[1], ll.row(&[0.0, 0.0]));
    }
}
