//! Recover the posterior mean of a 2-D isotropic Gaussian likelihood,
//! starting from a standard-normal prior, and report the total
//! log-evidence accumulated across stages.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::StandardNormal;
use std::io;

use tmcmc::evaluator::{Evaluators, LogLikelihood, LogTargetDensity};
use tmcmc::population::Population;
use tmcmc::stage::RunState;
use tmcmc::TmcmcRunner;

struct IsotropicGaussian {
    mean: f64,
}

impl LogLikelihood for IsotropicGaussian {
    fn batch(&self, samples: &DMatrix<f64>) -> DVector<f64> {
        DVector::from_iterator(
            samples.nrows(),
            samples
                .row_iter()
                .map(|r| -0.5 * r.iter().map(|x| (x - self.mean).powi(2)).sum::<f64>()),
        )
    }

    fn row(&self, sample: &[f64]) -> f64 {
        -0.5 * sample.iter().map(|x| (x - self.mean).powi(2)).sum::<f64>()
    }
}

struct SameAsLikelihood;
impl LogTargetDensity for SameAsLikelihood {
    fn row(&self, _sample: &[f64], log_likelihood: f64) -> f64 {
        log_likelihood
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(0);
    let (n, d) = (1000, 2);

    let samples = DMatrix::from_fn(n, d, |_, _| rng.sample::<f64, _>(StandardNormal));
    let log_likelihood = IsotropicGaussian { mean: 10.0 };
    let ll = log_likelihood.batch(&samples);
    let target = ll.clone();
    let population = Population::new(samples, ll, target).expect("shapes agree by construction");

    let log_target_density = SameAsLikelihood;
    let evaluators = Evaluators {
        log_likelihood: &log_likelihood,
        log_target_density: &log_target_density,
    };

    let run_state = RunState::new(population);
    let runner = TmcmcRunner::new();
    let result = runner
        .run(run_state, 0, &evaluators, &mut rng)
        .expect("tmcmc run should not hit a degenerate stage on this model");

    let final_population = &result.last().population;
    let samples = final_population.samples();
    let n_final = samples.nrows() as f64;
    let mean: DVector<f64> = samples.row_iter().fold(DVector::zeros(d), |acc, r| acc + r.transpose()) / n_final;

    let total_log_evidence: f64 = result.iter().map(|s| s.log_evidence_increment).sum();

    println!("stages run: {}", result.len() - 1);
    println!("posterior mean: {:.3?}", mean.as_slice());
    println!("total log-evidence: {:.4}", total_log_evidence);

    Ok(())
}
