//! Whole-run orchestration: one independent pass per door, then frames.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assemble::{assemble_door_until, finish_door};
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::invariants::validate;
use crate::markov::{INITIAL_STATE, generate_state_sequence};
use crate::state::DoorState;

/// Run-level inputs (what `door_config::Simulation` selects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    /// Markov transitions per door.
    pub iterations: usize,
    /// Ticks written before the closing ramp.
    pub horizon_ticks: usize,
    /// Door ids in output column order.
    pub doors: Vec<String>,
    /// Run seed; `None` draws every door stream from OS entropy.
    pub seed: Option<u64>,
}

impl Default for RunParams {
    fn default() -> Self {
        (&door_config::Simulation::default()).into()
    }
}

impl RunParams {
    /// Seed of the random stream for the door at `index`.
    #[inline]
    pub fn door_seed(&self, index: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(index as u64))
    }
}

/// One door's finished, validated samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorTrace {
    pub door: String,
    pub states: Vec<DoorState>,
    pub samples: Vec<i32>,
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub timestamp_ms: u64,
    pub angles: Vec<i32>,
}

/// Result of a run. Every trace has the same length.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub tick_ms: u32,
    pub doors: Vec<DoorTrace>,
}

impl Simulation {
    /// Number of rows (ticks) in the output.
    pub fn len(&self) -> usize {
        self.doors.first().map_or(0, |d| d.samples.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn door_ids(&self) -> impl Iterator<Item = &str> {
        self.doors.iter().map(|d| d.door.as_str())
    }

    /// Timestamp of row `i`: `i * tick_ms`, starting at 0.
    #[inline]
    pub fn timestamp_ms(&self, i: usize) -> u64 {
        i as u64 * u64::from(self.tick_ms)
    }

    pub fn rows(&self) -> impl Iterator<Item = Frame> + '_ {
        (0..self.len()).map(move |i| Frame {
            timestamp_ms: self.timestamp_ms(i),
            angles: self.doors.iter().map(|d| d.samples[i]).collect(),
        })
    }

    /// Stream every row into `sink`, then finish it.
    pub fn write_to<S: door_traits::FrameSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let mut angles = Vec::with_capacity(self.doors.len());
        for i in 0..self.len() {
            angles.clear();
            angles.extend(self.doors.iter().map(|d| d.samples[i]));
            sink.write_frame(self.timestamp_ms(i), &angles)
                .map_err(|e| eyre::eyre!("write frame {i}: {e}"))?;
        }
        sink.finish().map_err(|e| eyre::eyre!("finish output: {e}"))?;
        Ok(())
    }
}

/// Validated motion constants plus the per-door pipeline.
#[derive(Debug, Clone)]
pub struct Generator {
    cfg: SimConfig,
}

impl Generator {
    /// Fails on a transition row that does not sum to 1.0 or unsafe timing.
    pub fn new(cfg: SimConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    /// Generate, assemble, finish and validate one door with its own stream.
    pub fn door<R: rand::Rng + ?Sized>(
        &self,
        door: &str,
        rng: &mut R,
        iterations: usize,
        horizon_ticks: usize,
    ) -> Result<DoorTrace> {
        let states =
            generate_state_sequence(&self.cfg.transitions, rng, INITIAL_STATE, iterations);
        // Samples past the closing ramp's start sample are never written.
        let raw = assemble_door_until(&self.cfg, rng, &states, horizon_ticks + 1);
        tracing::debug!(
            door,
            transitions = iterations,
            raw_samples = raw.len(),
            "door assembled"
        );
        let samples = finish_door(&self.cfg, door, raw, horizon_ticks)?;
        validate(door, &samples, &self.cfg.limits)?;
        Ok(DoorTrace {
            door: door.to_string(),
            states,
            samples,
        })
    }

    /// Run every door. Any invariant failure aborts the whole run.
    pub fn run(&self, params: &RunParams) -> Result<Simulation> {
        if params.doors.is_empty() {
            return Err(SimError::EmptyDoorSet.into());
        }
        tracing::info!(
            doors = params.doors.len(),
            iterations = params.iterations,
            horizon_ticks = params.horizon_ticks,
            seeded = params.seed.is_some(),
            "generation start"
        );
        let mut doors = Vec::with_capacity(params.doors.len());
        for (index, id) in params.doors.iter().enumerate() {
            let _span = tracing::info_span!("door", id = id.as_str()).entered();
            let mut rng = match params.door_seed(index) {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let trace = self.door(id, &mut rng, params.iterations, params.horizon_ticks)?;
            tracing::debug!(samples = trace.samples.len(), "door validated");
            doors.push(trace);
        }
        let sim = Simulation {
            tick_ms: self.cfg.tick_ms,
            doors,
        };
        tracing::info!(rows = sim.len(), "generation complete");
        Ok(sim)
    }
}
