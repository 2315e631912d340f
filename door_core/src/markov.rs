//! Markov state sequencing per door.

use rand::Rng;

use crate::config::TransitionMatrix;
use crate::state::DoorState;

/// Every door starts out closed.
pub const INITIAL_STATE: DoorState = DoorState::Closed;

/// Draw the state following `from`.
#[inline]
pub fn next_state<R: Rng + ?Sized>(
    matrix: &TransitionMatrix,
    rng: &mut R,
    from: DoorState,
) -> DoorState {
    let u: f64 = rng.r#gen();
    matrix.next_state(from, u)
}

/// Generate `count` transitions starting from `initial`.
///
/// The result holds `count + 1` states and begins with `initial`; doors are
/// always started from `INITIAL_STATE`. The matrix is expected to be
/// validated by the caller.
pub fn generate_state_sequence<R: Rng + ?Sized>(
    matrix: &TransitionMatrix,
    rng: &mut R,
    initial: DoorState,
    count: usize,
) -> Vec<DoorState> {
    let mut states = Vec::with_capacity(count + 1);
    let mut current = initial;
    states.push(current);
    for _ in 0..count {
        current = next_state(matrix, rng, current);
        states.push(current);
    }
    states
}
