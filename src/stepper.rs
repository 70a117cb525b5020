//! The temperature stepper: chooses the next β increment so the weight
//! coefficient of variation equals a target threshold, falling back to a
//! geometric shrinkage search when bisection is not feasible or does not
//! converge. See `spec.md` §4.2.

use log::trace;
use nalgebra::DVector;

use crate::weights::{coefficient_of_variation, compute_weights};

/// Bisection convergence tolerance on the bracket width.
const BISECTION_TOL: f64 = 1e-10;
/// Hard cap on bisection iterations before falling back to shrinkage.
const BISECTION_MAX_ITER: usize = 200;
/// Multiplicative shrink factor for the geometric fallback search.
const SHRINKAGE_FACTOR: f64 = 0.99;

/// `CoV(weights(beta_increment, log_likelihoods)) - threshold_cov`.
///
/// Weights that fail to normalize (all non-finite log-likelihoods) are
/// treated as having infinite CoV, the same tie-break `spec.md` §4.2
/// prescribes for NaN stddev/mean.
fn cov_objective(beta_increment: f64, log_likelihoods: &DVector<f64>, threshold_cov: f64) -> f64 {
    let cov = match compute_weights(beta_increment, log_likelihoods) {
        Ok(result) => coefficient_of_variation(&result.weights),
        Err(_) => f64::INFINITY,
    };
    cov - threshold_cov
}

/// Choose the next β so that the importance-weight CoV equals
/// `threshold_cov`, per `spec.md` §4.2's three-branch algorithm.
///
/// Returns `min(beta + root, 1)` in all branches; never errors, since
/// both stepper infeasibility and bisection non-convergence are handled
/// locally as the spec requires.
pub fn next_beta(log_likelihoods: &DVector<f64>, beta: f64, threshold_cov: f64) -> f64 {
    let remaining = 1.0 - beta;
    let f = |db: f64| cov_objective(db, log_likelihoods, threshold_cov);

    let f_lo = f(0.0);
    let f_hi = f(remaining);

    if f_lo.signum() == f_hi.signum() {
        // CoV never reaches the threshold inside the feasible range: jump
        // straight to the posterior.
        return 1.0;
    }

    if let Some(root) = bisect(f, 0.0, remaining) {
        return (beta + root).min(1.0);
    }

    trace!("bisection did not converge for beta={}; falling back to geometric shrinkage", beta);
    let mut db = remaining;
    while f(db) > 0.0 {
        db *= SHRINKAGE_FACTOR;
        if db <= 0.0 {
            break;
        }
    }
    (beta + db).min(1.0)
}

/// Bisect `f` on `[lo, hi]`, assuming `f(lo)` and `f(hi)` already have
/// opposite signs. Returns `None` if the bracket does not converge within
/// `BISECTION_MAX_ITER` iterations.
fn bisect(f: impl Fn(f64) -> f64, mut lo: f64, mut hi: f64) -> Option<f64> {
    let mut f_lo = f(lo);

    for _ in 0..BISECTION_MAX_ITER {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);

        if f_mid == 0.0 || (hi - lo) < BISECTION_TOL {
            return Some(mid);
        }

        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_log_likelihood_jumps_to_posterior() {
        // S2: CoV is identically 0 < tau, so the stepper should jump to
        // beta = 1 on the first call for any starting beta in [0, 1).
        let ll = DVector::from_vec(vec![3.0; 50]);
        for beta in [0.0, 0.2, 0.5, 0.9] {
            assert_eq!(next_beta(&ll, beta, 1.0), 1.0);
        }
    }

    #[test]
    fn dispersed_log_likelihood_brackets_an_interior_beta() {
        // S3: with enough dispersion in log-likelihoods, the returned
        // increment should land strictly inside (0, 1) and hit the CoV
        // target closely.
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        use rand_distr::{Distribution, Normal};

        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let normal = Normal::new(0.0, 9.0).unwrap();
        let ll = DVector::from_iterator(400, (0..400).map(|_| normal.sample(&mut rng)));

        let new_beta = next_beta(&ll, 0.0, 1.0);
        assert!(new_beta > 0.0 && new_beta < 1.0);

        let weights = compute_weights(new_beta, &ll).unwrap().weights;
        let cov = coefficient_of_variation(&weights);
        assert!((cov - 1.0).abs() < 1e-6);
    }

    #[test]
    fn beta_never_exceeds_one() {
        let ll = DVector::from_vec(vec![-1.0, -2.0, -0.5]);
        let new_beta = next_beta(&ll, 0.95, 1.0);
        assert!(new_beta <= 1.0);
    }
}
