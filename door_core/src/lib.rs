#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Door angle trace generation (I/O-free).
//!
//! Produces, per door, a dense sequence of angle samples at a fixed tick
//! that a downstream robot-arm program replays. Serialization happens
//! through `door_traits::FrameSink`, implemented outside this crate.
//!
//! ## Architecture
//!
//! - **States**: `DoorState` and its rest angles (`state` module)
//! - **Configuration**: transition matrix, dwell ranges, ramp timing, limits (`config`)
//! - **Markov**: per-door state sequences (`markov`)
//! - **Profile**: dwell + three-segment dampened ramp (`profile`)
//! - **Assembly**: concatenation, horizon cut, closing ramp (`assemble`)
//! - **Invariants**: range and rate gates on finished samples (`invariants`)
//! - **Run**: seeding, per-door pipeline, frames (`run`)
//!
//! ## Units
//!
//! Angles are integer steps: 0 closed, 3000 half-open, 6000 open (about 90
//! degrees). One tick is `SimConfig::tick_ms` milliseconds (10 by default).

pub mod assemble;
pub mod config;
pub mod conversions;
pub mod error;
pub mod invariants;
pub mod markov;
pub mod profile;
pub mod run;
pub mod state;

pub use assemble::{assemble_door, assemble_door_until, assemble_plans, closing_ramp, finish_door};
pub use config::{DwellCfg, DwellRange, Limits, MoveDuration, RampCfg, SimConfig, TransitionMatrix};
pub use error::{Result, SimError};
pub use invariants::validate;
pub use markov::{INITIAL_STATE, generate_state_sequence};
pub use profile::{Ramp, Segment, TransitionPlan, generate_transition_samples};
pub use run::{DoorTrace, Frame, Generator, RunParams, Simulation};
pub use state::DoorState;
