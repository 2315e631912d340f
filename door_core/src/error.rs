use crate::state::DoorState;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A transition-matrix row does not sum to 1.0; a construction bug.
    #[error("transition row for '{state}' sums to {sum}, expected 1.0")]
    TransitionRowSum { state: DoorState, sum: f64 },
    #[error("invalid timing: {0}")]
    InvalidTiming(String),
    #[error("door '{door}': sample {index} = {value} is outside [{min}, {max}]")]
    AngleOutOfRange {
        door: String,
        index: usize,
        value: i32,
        min: i32,
        max: i32,
    },
    #[error("door '{door}': step {prev} -> {next} at sample {index} exceeds {max_step}")]
    ExcessiveStep {
        door: String,
        index: usize,
        prev: i32,
        next: i32,
        max_step: i32,
    },
    #[error("door '{door}': horizon needs {needed} samples, only {available} generated")]
    HorizonExceedsSamples {
        door: String,
        needed: usize,
        available: usize,
    },
    #[error("no doors to simulate")]
    EmptyDoorSet,
}

impl SimError {
    /// True for violations found in generated data (as opposed to setup errors).
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            SimError::AngleOutOfRange { .. } | SimError::ExcessiveStep { .. }
        )
    }
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
