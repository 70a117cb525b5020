//! Error types for the TMCMC core.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Errors raised by the TMCMC core.
///
/// Every variant here corresponds to a *fatal* condition: the driver never
/// appends a partial stage when one of these is returned. Conditions the
/// spec treats as locally recoverable (stepper infeasibility, bisection
/// non-convergence) are handled in-place and never surface as a `TmcmcError`.
#[derive(Clone, Debug, PartialEq)]
pub enum TmcmcError {
    /// All log-likelihoods were `-inf`/NaN, so importance weights could not
    /// be normalized for resampling.
    DegenerateWeights,
    /// The Cholesky decomposition of the proposal covariance failed; the
    /// weighted sample cloud does not span the full dimensionality.
    NonPositiveDefinite(String),
    /// An evaluator returned the wrong number of values for a single-row
    /// call.
    InvalidEvaluatorOutput {
        /// Number of values the evaluator was expected to return (always 1).
        expected: usize,
        /// Number of values the evaluator actually returned.
        got: usize,
    },
    /// `Population::new` was given arrays whose lengths disagree.
    ShapeMismatch {
        /// Human-readable description of which arrays disagreed.
        detail: String,
    },
}

impl TmcmcError {
    /// Build the size-mismatch variant with the literal message used by the
    /// reference implementation's evaluator contract.
    pub fn invalid_evaluator_output(got: usize) -> Self {
        TmcmcError::InvalidEvaluatorOutput { expected: 1, got }
    }
}

impl Display for TmcmcError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TmcmcError::DegenerateWeights => {
                write!(f, "all log-likelihoods are non-finite; weights are degenerate")
            }
            TmcmcError::NonPositiveDefinite(msg) => {
                write!(f, "Cholesky decomposition failed: {}", msg)
            }
            TmcmcError::InvalidEvaluatorOutput { expected: _, got } => {
                write!(f, "Expected a single value, but got {} values.", got)
            }
            TmcmcError::ShapeMismatch { detail } => {
                write!(f, "population shape mismatch: {}", detail)
            }
        }
    }
}

impl Error for TmcmcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

/// Convenience alias for fallible TMCMC operations.
pub type Result<T> = std::result::Result<T, TmcmcError>;
