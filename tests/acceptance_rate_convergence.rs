//! Property 6 of `spec.md` §8: over a long synthetic run with a smooth
//! unimodal target, the running acceptance rate of the adaptive-scale
//! Metropolis-Hastings chain converges to within ±0.05 of the target
//! acceptance rate `0.23 + 0.21/d`.
//!
//! This drives the crate's own `ScaleAdaptor` (the exact epoch-counted
//! schedule `rejuvenation::rejuvenate` uses per output row) against a
//! standard multivariate-normal target, whose covariance is `I_d`, so
//! the scaled proposal's Cholesky factor is simply `scale * I_d` — no
//! weighted sample cloud is needed to exercise the adaptor in isolation.

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rand_distr::StandardNormal;

use tmcmc::adaptor::ScaleAdaptor;

#[test]
fn acceptance_rate_converges_to_target() {
    let d = 2usize;
    let target_acceptance_rate = 0.23 + 0.21 / d as f64;
    let initial_scale = 2.4 / (d as f64).sqrt();
    let adapt_frequency = 50usize;
    let epochs = 400usize;

    let mut rng = StdRng::seed_from_u64(0xACCE9);
    let mut adaptor = ScaleAdaptor::new(initial_scale, target_acceptance_rate, adapt_frequency);

    let mut current = DVector::<f64>::zeros(d);
    let mut current_log_pi: f64 = 0.0;

    let mut window_accepts = 0u64;
    let mut window_rates = Vec::with_capacity(epochs);

    for step in 0..(epochs * adapt_frequency) {
        adaptor.begin_step();
        let scale = adaptor.scale();

        let z = DVector::from_iterator(d, (0..d).map(|_| rng.sample::<f64, _>(StandardNormal)));
        let proposed = &current + z * scale;
        let proposed_log_pi = -0.5 * proposed.dot(&proposed);

        let log_alpha = proposed_log_pi - current_log_pi;
        let u: f64 = rng.gen();
        if u.ln() <= log_alpha {
            current = proposed;
            current_log_pi = proposed_log_pi;
            adaptor.record_accept();
            window_accepts += 1;
        }

        if (step + 1) % adapt_frequency == 0 {
            window_rates.push(window_accepts as f64 / adapt_frequency as f64);
            window_accepts = 0;
        }
    }

    // Average the windowed acceptance rate over the final quarter of
    // epochs, once the Robbins-Monro-style schedule has had time to
    // settle, rather than over the whole (still-adapting) run.
    let tail = &window_rates[window_rates.len() * 3 / 4..];
    let mean_rate: f64 = tail.iter().sum::<f64>() / tail.len() as f64;

    assert!(
        (mean_rate - target_acceptance_rate).abs() < 0.05,
        "mean acceptance rate over tail epochs = {}, target = {}",
        mean_rate,
        target_acceptance_rate
    );
}
