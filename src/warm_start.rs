//! The warm-start selector: given a prior run's stages and an updated
//! (cheaper or revised) log-likelihood evaluator, choose the highest
//! stage at which resuming is still a valid importance-sampling
//! correction, rather than restarting from the prior. See `spec.md`
//! §4.6.

use nalgebra::DVector;

use crate::evaluator::LogLikelihood;
use crate::stage::RunState;
use crate::weights::coefficient_of_variation;

/// Re-weight a stored stage's samples as proposals for the same β under a
/// new log-likelihood: `w̃ᵢ ∝ exp(β·(ℓ′ᵢ − ℓᵢ))`.
fn reweight(beta: f64, new_log_likelihoods: &DVector<f64>, old_log_likelihoods: &DVector<f64>) -> DVector<f64> {
    let log_weights = (new_log_likelihoods - old_log_likelihoods).map(|delta| beta * delta);
    let max = log_weights.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let shifted = log_weights.map(|lw| (lw - max).exp());
    let sum: f64 = shifted.iter().sum();
    shifted.map(|w| w / sum)
}

/// Scan `run`'s stages in descending order and return the highest stage
/// index whose re-weighted CoV under `new_log_likelihood` is below
/// `threshold_cov`. Returns 0 (restart from the prior) if no stage
/// qualifies.
pub fn select_warm_start_stage(run: &RunState, new_log_likelihood: &dyn LogLikelihood, threshold_cov: f64) -> usize {
    for stage in (0..run.len()).rev() {
        let record = run.get(stage).expect("stage index from 0..len is always present");
        let new_ll = new_log_likelihood.batch(record.population.samples());
        let weights = reweight(record.beta, &new_ll, record.population.log_likelihoods());
        if coefficient_of_variation(&weights) < threshold_cov {
            return stage;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Population;
    use crate::stage::StageRecord;
    use nalgebra::DMatrix;

    struct EchoLikelihood;
    impl LogLikelihood for EchoLikelihood {
        fn batch(&self, samples: &DMatrix<f64>) -> DVector<f64> {
            DVector::from_iterator(samples.nrows(), samples.row_iter().map(|r| -0.5 * r.iter().map(|x| x * x).sum::<f64>()))
        }

        fn row(&self, sample: &[f64]) -> f64 {
            -0.5 * sample.iter().map(|x| x * x).sum::<f64>()
        }
    }

    #[test]
    fn identity_case_returns_highest_stage() {
        // S5: reusing the original run's own likelihood as the "new"
        // approximation must return the maximum stage key, since the
        // re-weighting collapses to uniform weights (delta = 0 exactly).
        let like = EchoLikelihood;
        let samples = DMatrix::from_fn(20, 2, |i, j| ((i + j) as f64) * 0.01);
        let ll = like.batch(&samples);
        let target = ll.clone();
        let population = Population::new(samples, ll, target).unwrap();

        let mut run = RunState::new(population.clone());
        run.push(StageRecord {
            beta: 0.4,
            log_evidence_increment: -1.0,
            population: population.clone(),
        });
        run.push(StageRecord {
            beta: 1.0,
            log_evidence_increment: -0.5,
            population,
        });

        let selected = select_warm_start_stage(&run, &like, 1.0);
        assert_eq!(selected, run.last_index());
    }

    #[test]
    fn no_qualifying_stage_restarts_from_prior() {
        struct WildlyDifferentLikelihood;
        impl LogLikelihood for WildlyDifferentLikelihood {
            fn batch(&self, samples: &DMatrix<f64>) -> DVector<f64> {
                DVector::from_iterator(samples.nrows(), samples.row_iter().enumerate().map(|(i, _)| if i == 0 { 0.0 } else { -1e6 }))
            }
            fn row(&self, _sample: &[f64]) -> f64 {
                0.0
            }
        }

        let samples = DMatrix::from_fn(10, 2, |i, j| ((i + j) as f64) * 0.01);
        let ll = DVector::from_vec(vec![0.0; 10]);
        let target = ll.clone();
        let population = Population::new(samples, ll, target).unwrap();
        let mut run = RunState::new(population.clone());
        run.push(StageRecord {
            beta: 1.0,
            log_evidence_increment: 0.0,
            population,
        });

        let weird = WildlyDifferentLikelihood;
        let selected = select_warm_start_stage(&run, &weird, 1.0);
        assert_eq!(selected, 0);
    }
}
