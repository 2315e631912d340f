//! Safety gates on finished sample sequences.
//!
//! These check the generator's own output before anything is persisted. A
//! failure means the ramp math is wrong, so the run is aborted rather than
//! written partially.

use crate::config::Limits;
use crate::error::SimError;

/// Check range and per-tick rate of one door's samples. First failure wins.
pub fn validate(door: &str, samples: &[i32], limits: &Limits) -> Result<(), SimError> {
    if let Some((index, &value)) = samples
        .iter()
        .enumerate()
        .find(|(_, v)| !(limits.min_angle..=limits.max_angle).contains(*v))
    {
        return Err(SimError::AngleOutOfRange {
            door: door.to_string(),
            index,
            value,
            min: limits.min_angle,
            max: limits.max_angle,
        });
    }

    if let Some((i, w)) = samples
        .windows(2)
        .enumerate()
        .find(|(_, w)| (w[1] - w[0]).abs() > limits.max_step)
    {
        return Err(SimError::ExcessiveStep {
            door: door.to_string(),
            index: i + 1,
            prev: w[0],
            next: w[1],
            max_step: limits.max_step,
        });
    }

    Ok(())
}
