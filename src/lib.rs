//! `tmcmc` is a Transitional Markov Chain Monte Carlo (TMCMC) core: an
//! adaptive, multi-stage Bayesian inference engine that carries a
//! population of prior-distributed samples to the posterior through a
//! sequence of tempered intermediate distributions, while producing an
//! unbiased estimate of the model evidence.
//!
//! The crate consumes two user-supplied evaluators
//! ([`evaluator::LogLikelihood`], [`evaluator::LogTargetDensity`]) and a
//! [`rand::Rng`]; it does not know about the physical or statistical
//! model behind the likelihood, the surrogate evaluating it, or any
//! orchestration that parallelizes likelihood calls — those are the
//! caller's concern.
//!
//! ```
//! use nalgebra::{DMatrix, DVector};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use tmcmc::evaluator::{Evaluators, LogLikelihood, LogTargetDensity};
//! use tmcmc::population::Population;
//! use tmcmc::stage::RunState;
//! use tmcmc::driver::TmcmcRunner;
//!
//! struct IsotropicGaussian { mean: f64 }
//!
//! impl LogLikelihood for IsotropicGaussian {
//!     fn batch(&self, samples: &DMatrix<f64>) -> DVector<f64> {
//!         DVector::from_iterator(samples.nrows(), samples.row_iter().map(|r| {
//!             -0.5 * r.iter().map(|x| (x - self.mean).powi(2)).sum::<f64>()
//!         }))
//!     }
//!     fn row(&self, sample: &[f64]) -> f64 {
//!         -0.5 * sample.iter().map(|x| (x - self.mean).powi(2)).sum::<f64>()
//!     }
//! }
//!
//! struct SameAsLikelihood;
//! impl LogTargetDensity for SameAsLikelihood {
//!     fn row(&self, _sample: &[f64], log_likelihood: f64) -> f64 { log_likelihood }
//! }
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let (n, d) = (200, 2);
//! let samples = DMatrix::from_fn(n, d, |_, _| rng.sample::<f64, _>(rand_distr::StandardNormal));
//!
//! let log_likelihood = IsotropicGaussian { mean: 10.0 };
//! let ll = log_likelihood.batch(&samples);
//! let target = ll.clone();
//! let population = Population::new(samples, ll, target).unwrap();
//!
//! let log_target_density = SameAsLikelihood;
//! let evaluators = Evaluators {
//!     log_likelihood: &log_likelihood,
//!     log_target_density: &log_target_density,
//! };
//!
//! let run_state = RunState::new(population);
//! let result = TmcmcRunner::new().run(run_state, 0, &evaluators, &mut rng).unwrap();
//! assert_eq!(result.last().beta, 1.0);
//! ```

#[cfg(feature = "serde_support")]
#[macro_use]
extern crate serde_derive;

pub mod adaptor;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod population;
pub mod proposal;
pub mod rejuvenation;
pub mod stage;
pub mod stepper;
pub mod warm_start;
pub mod weights;

pub use driver::TmcmcRunner;
pub use error::{Result, TmcmcError};
pub use evaluator::{Evaluators, LogLikelihood, LogTargetDensity};
pub use population::Population;
pub use rejuvenation::StageConfig;
pub use stage::{RunState, StageRecord};
pub use warm_start::select_warm_start_stage;
