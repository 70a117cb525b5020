//! Stage history: an ordered sequence of `StageRecord`, replacing the
//! reference implementation's five integer-keyed dictionaries (Design
//! Note: "a systems implementation should prefer an ordered sequence of
//! `StageRecord`, indexed by position; the integer keys are dense and
//! monotonic").

use crate::population::Population;

/// One entry of the run history: the population at this stage, the β it
/// was drawn at, and this stage's contribution to total log-evidence.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct StageRecord {
    /// Tempering parameter β ∈ [0, 1] for this stage.
    pub beta: f64,
    /// This stage's contribution to total log-evidence. Zero for stage 0.
    pub log_evidence_increment: f64,
    /// The population produced by (or seeding, for stage 0) this stage.
    pub population: Population,
}

impl StageRecord {
    /// Build the initial (β = 0) stage record from a prior-distributed
    /// population.
    pub fn initial(population: Population) -> Self {
        Self {
            beta: 0.0,
            log_evidence_increment: 0.0,
            population,
        }
    }
}

/// The full run history, index 0 holding the initial population.
///
/// `RunState::push` is the only mutation point and enforces invariant 2
/// of the data model: β is monotonically non-decreasing across stages.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct RunState(Vec<StageRecord>);

impl RunState {
    /// Start a run state from the initial (β = 0) population.
    pub fn new(initial: Population) -> Self {
        RunState(vec![StageRecord::initial(initial)])
    }

    /// Wrap an already-built history, e.g. one loaded back in from a
    /// caller's persistence layer (out of scope for this crate).
    pub fn from_records(records: Vec<StageRecord>) -> Self {
        RunState(records)
    }

    /// Number of stages recorded so far (including stage 0).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if no stages have been recorded (never true once constructed
    /// through `new`).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stage record at the given index, if present.
    pub fn get(&self, stage: usize) -> Option<&StageRecord> {
        self.0.get(stage)
    }

    /// The most recently appended stage record.
    pub fn last(&self) -> &StageRecord {
        self.0.last().expect("RunState is never empty")
    }

    /// Index of the most recently appended stage.
    pub fn last_index(&self) -> usize {
        self.0.len() - 1
    }

    /// Iterate stages in ascending index order.
    pub fn iter(&self) -> std::slice::Iter<'_, StageRecord> {
        self.0.iter()
    }

    /// Append a new stage record. Panics (in debug builds) if β regresses,
    /// which would violate invariant 2 and indicates a driver bug rather
    /// than a recoverable error.
    pub fn push(&mut self, record: StageRecord) {
        debug_assert!(
            record.beta >= self.last().beta,
            "beta must be non-decreasing across stages"
        );
        self.0.push(record);
    }

    /// All stage records as a slice.
    pub fn as_slice(&self) -> &[StageRecord] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{DMatrix, DVector};

    fn toy_population(n: usize, d: usize) -> Population {
        Population::new(DMatrix::zeros(n, d), DVector::zeros(n), DVector::zeros(n)).unwrap()
    }

    #[test]
    fn new_run_state_starts_at_beta_zero() {
        let rs = RunState::new(toy_population(4, 2));
        assert_eq!(rs.len(), 1);
        assert_eq!(rs.last().beta, 0.0);
        assert_eq!(rs.last().log_evidence_increment, 0.0);
    }

    #[test]
    #[should_panic]
    fn push_rejects_decreasing_beta() {
        let mut rs = RunState::new(toy_population(4, 2));
        rs.push(StageRecord {
            beta: -0.1,
            log_evidence_increment: 0.0,
            population: toy_population(4, 2),
        });
    }
}
