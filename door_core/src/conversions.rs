//! `From` implementations bridging `door_config` types to `door_core` types.

use crate::run::RunParams;

// ── RunParams ────────────────────────────────────────────────────────────────

impl From<&door_config::Simulation> for RunParams {
    fn from(c: &door_config::Simulation) -> Self {
        Self {
            iterations: c.iterations,
            horizon_ticks: c.horizon_ticks,
            doors: c.doors.clone(),
            seed: c.seed,
        }
    }
}

impl From<&door_config::Config> for RunParams {
    fn from(c: &door_config::Config) -> Self {
        (&c.simulation).into()
    }
}
