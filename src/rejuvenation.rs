//! The rejuvenation engine: for each of N output rows, draw a seed from
//! the resampling distribution and advance it through a short adaptive
//! Metropolis-Hastings chain. See `spec.md` §4.4 — the hardest
//! subcomponent, and the only one that mutates shared state across the
//! per-row loop (§5 "Concurrency & Resource Model").

use nalgebra::{DMatrix, DVector};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::adaptor::ScaleAdaptor;
use crate::error::Result;
use crate::evaluator::Evaluators;
use crate::population::Population;
use crate::proposal::build_proposal;
use crate::weights::compute_weights;

/// Per-run configuration, the Rust shape of `spec.md` §6's configuration
/// table. Defaults match the table exactly.
#[derive(Clone, Copy, Debug)]
pub struct StageConfig {
    /// CoV target τ for the temperature stepper.
    pub threshold_cov: f64,
    /// MH steps per output row in normal stages.
    pub num_steps: usize,
    /// Step multiplier applied at β = 1 or when thinning is requested.
    pub thinning_factor: usize,
    /// MH steps between scale-adaptation events.
    pub adapt_frequency: usize,
    /// Extra seed draws discarded per stage before emission begins.
    pub num_burn_in: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            threshold_cov: 1.0,
            num_steps: 1,
            thinning_factor: 10,
            adapt_frequency: 50,
            num_burn_in: 0,
        }
    }
}

/// Run the rejuvenation engine for one stage.
///
/// `initial_cholesky` is the proposal's Cholesky factor at stage entry,
/// built by [`crate::proposal::build_proposal`] from the *original*
/// (pre-rejuvenation) population; it is rebuilt from `current_samples`
/// whenever the scale adaptor crosses an `adapt_frequency` boundary,
/// matching the reference implementation's literal (rather than the more
/// principled original-sample) choice — see `spec.md` Open Question 2.
///
/// `weights` seeds the resampling distribution and is itself updated
/// in place after every post-burn-in acceptance, so later seed draws are
/// biased toward the partially-refreshed population (`spec.md` §4.4 step
/// 3e).
///
/// This function assumes the caller's [`crate::evaluator::LogTargetDensity`]
/// encodes a *symmetric* proposal's tempered posterior already — the
/// Metropolis acceptance ratio below omits a Hastings correction term by
/// design (`spec.md` Open Question 1).
#[allow(clippy::too_many_arguments)]
pub fn rejuvenate(
    population: &Population,
    initial_cholesky: DMatrix<f64>,
    beta: f64,
    new_beta: f64,
    mut weights: DVector<f64>,
    scale_factor: f64,
    target_acceptance_rate: f64,
    config: &StageConfig,
    evaluators: &Evaluators,
    do_thinning: bool,
    rng: &mut impl Rng,
) -> Result<Population> {
    let n = population.len();
    let d = population.dim();
    let beta_increment = new_beta - beta;

    let mut current_samples = population.samples().clone();
    let mut current_ll = population.log_likelihoods().clone();
    let mut current_target = population.log_target().clone();

    let mut l = initial_cholesky;
    let mut adaptor = ScaleAdaptor::new(scale_factor, target_acceptance_rate, config.adapt_frequency);

    let mut out_samples = DMatrix::<f64>::zeros(n, d);
    let mut out_ll = DVector::<f64>::zeros(n);
    let mut out_target = DVector::<f64>::zeros(n);

    let use_thinning = new_beta >= 1.0 || do_thinning;
    let total_outer = config.num_burn_in + n;

    for k in 0..total_outer {
        let weight_slice: Vec<f64> = weights.iter().cloned().collect();
        let categorical = WeightedIndex::new(&weight_slice)
            .expect("resampling weights must form a valid categorical distribution");
        let index = categorical.sample(rng);

        let inner_steps = if k >= config.num_burn_in && use_thinning {
            config.num_steps * config.thinning_factor
        } else {
            config.num_steps
        };

        for _ in 0..inner_steps {
            if adaptor.begin_step() {
                l = build_proposal(&current_samples, &weights, adaptor.scale())?;
            }

            let z = DVector::from_iterator(d, (0..d).map(|_| rng.sample(StandardNormal)));
            let current_row = current_samples.row(index).transpose();
            let proposed = current_row + &l * z;
            let proposed_slice: Vec<f64> = proposed.iter().cloned().collect();

            let ll_star = evaluators.log_likelihood.row(&proposed_slice);
            let target_star = evaluators.log_target_density.row(&proposed_slice, ll_star);

            let log_alpha = target_star - current_target[index];
            let u: f64 = rng.gen();
            let accept = u.ln() <= log_alpha;

            if accept {
                current_samples.set_row(index, &proposed.transpose());
                current_ll[index] = ll_star;
                current_target[index] = target_star;
                adaptor.record_accept();

                if k >= config.num_burn_in {
                    weights = compute_weights(beta_increment, &current_ll)?.weights;
                }
            }
        }

        if k >= config.num_burn_in {
            let k_prime = k - config.num_burn_in;
            out_samples.set_row(k_prime, &current_samples.row(index));
            out_ll[k_prime] = current_ll[index];
            out_target[k_prime] = current_target[index];
        }
    }

    Population::new(out_samples, out_ll, out_target)
}
