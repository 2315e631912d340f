//! Discrete door positions.

use std::fmt;

/// One of the three door positions of the Markov process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorState {
    Closed,
    HalfOpen,
    Open,
}

impl DoorState {
    /// All states in matrix row/column order.
    pub const ALL: [DoorState; 3] = [DoorState::Closed, DoorState::HalfOpen, DoorState::Open];

    /// Row/column index into a transition table.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            DoorState::Closed => 0,
            DoorState::HalfOpen => 1,
            DoorState::Open => 2,
        }
    }

    /// Rest angle in steps (6000 is roughly 90 degrees).
    #[inline]
    pub const fn rest_angle(self) -> i32 {
        match self {
            DoorState::Closed => 0,
            DoorState::HalfOpen => 3000,
            DoorState::Open => 6000,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DoorState::Closed => "closed",
            DoorState::HalfOpen => "half-open",
            DoorState::Open => "open",
        }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
