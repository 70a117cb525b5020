//! On-line proposal-scale adaptation for the rejuvenation engine.
//!
//! This specializes the teacher crate's `Adaptor`/`ScaleAdaptor` trait
//! split (`steppers/adaptors/{simple,global_adaptor}.rs`) to the
//! CoV-driven, epoch-counted schedule `spec.md` §4.4 prescribes: every
//! `adapt_frequency` Metropolis-Hastings steps, fold the empirical
//! acceptance rate into a multiplicative update of `σ` and rebuild the
//! Cholesky factor from the current weighted sample cloud.

use log::debug;

/// Per-stage adaptive scale state: `σ`, the running accept/step counters,
/// and the adaptation epoch counter `n_adapt`.
///
/// Created on stage entry and discarded on stage exit (Data Model
/// "Lifecycle"); it carries no knowledge of the sample cloud itself, only
/// the scalar schedule — rebuilding `Σ`/`L` from the current samples is
/// the rejuvenation engine's job.
#[derive(Clone, Debug)]
pub struct ScaleAdaptor {
    scale: f64,
    target_acceptance_rate: f64,
    adapt_frequency: usize,
    num_accepts: u64,
    step_count: u64,
    n_adapt: u64,
}

impl ScaleAdaptor {
    /// Start a fresh adaptor at the stage-initial scale
    /// `2.4 / sqrt(d)`, targeting `target_acceptance_rate`.
    pub fn new(initial_scale: f64, target_acceptance_rate: f64, adapt_frequency: usize) -> Self {
        Self {
            scale: initial_scale,
            target_acceptance_rate,
            adapt_frequency,
            num_accepts: 0,
            step_count: 0,
            n_adapt: 1,
        }
    }

    /// Current proposal scale σ.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Mark the start of a new MH step. Increments the global step
    /// counter and, on crossing an `adapt_frequency` boundary, folds the
    /// acceptance rate over the just-completed window into `σ` and
    /// returns `true` so the caller knows to rebuild Σ and L before
    /// drawing this step's proposal.
    ///
    /// Must be called once per MH step, before evaluating the proposal,
    /// matching the reference implementation's check-then-step ordering.
    pub fn begin_step(&mut self) -> bool {
        self.step_count += 1;
        if self.step_count % self.adapt_frequency as u64 == 0 {
            let acceptance_rate = self.num_accepts as f64 / self.adapt_frequency as f64;
            self.num_accepts = 0;
            self.n_adapt += 1;

            let delta = (acceptance_rate - self.target_acceptance_rate) / (self.n_adapt as f64).sqrt();
            self.scale *= delta.exp();
            debug!(
                "adaptation epoch {}: acceptance_rate = {:.4}, scale -> {:.6}",
                self.n_adapt, acceptance_rate, self.scale
            );
            true
        } else {
            false
        }
    }

    /// Record that the just-evaluated proposal was accepted.
    pub fn record_accept(&mut self) {
        self.num_accepts += 1;
    }
}
