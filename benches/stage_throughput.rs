//! Benchmark a single TMCMC stage (weight kernel, temperature stepper,
//! proposal builder, and rejuvenation engine) across dimensions.

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256Plus;

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

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(0);

    let mut one_stage = |dims: usize| {
        let n = 200;
        let samples = DMatrix::from_fn(n, dims, |_, _| rng.sample::<f64, _>(StandardNormal));
        let log_likelihood = IsotropicGaussian { mean: 5.0 };
        let ll = log_likelihood.batch(&samples);
        let target = ll.clone();
        let population = Population::new(samples, ll, target).unwrap();

        let log_target_density = SameAsLikelihood;
        let evaluators = Evaluators {
            log_likelihood: &log_likelihood,
            log_target_density: &log_target_density,
        };

        let run_state = RunState::new(population);
        let runner = TmcmcRunner::new().num_burn_in(0);
        // Only the first stage's cost is what this benchmark measures; a
        // full run to beta = 1 would vary the iteration count with dims.
        let _ = runner.run(run_state, 0, &evaluators, &mut rng);
    };

    let mut group = c.benchmark_group("dimensions");

    for dims in [2, 4, 8] {
        group.bench_with_input(format!("one stage with {} dims", dims), &dims, |b, &dims| {
            b.iter(|| one_stage(dims))
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
