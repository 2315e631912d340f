//! Motion constants for the generator.
//!
//! These are the immutable runtime constants passed into every generator
//! call. They are separate from the TOML-deserialized run settings in
//! `door_config`, which only choose run length, doors and seed.

use crate::error::SimError;
use crate::state::DoorState;

/// Row-sum tolerance for the transition matrix.
pub const ROW_SUM_EPSILON: f64 = 1e-9;

/// 3x3 row-stochastic table indexed by `DoorState::index()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionMatrix {
    rows: [[f64; 3]; 3],
}

impl TransitionMatrix {
    pub const fn new(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn row(&self, from: DoorState) -> &[f64; 3] {
        &self.rows[from.index()]
    }

    #[inline]
    pub fn probability(&self, from: DoorState, to: DoorState) -> f64 {
        self.rows[from.index()][to.index()]
    }

    /// Every row must sum to 1.0 and hold no negative or non-finite entry.
    pub fn validate(&self) -> Result<(), SimError> {
        for state in DoorState::ALL {
            let row = self.row(state);
            let sum: f64 = row.iter().sum();
            let sane = row.iter().all(|p| p.is_finite() && *p >= 0.0);
            if !sane || (sum - 1.0).abs() > ROW_SUM_EPSILON {
                return Err(SimError::TransitionRowSum { state, sum });
            }
        }
        Ok(())
    }

    /// Pick the destination for a uniform draw `u` in [0, 1).
    ///
    /// Cumulative thresholds are walked in `DoorState::ALL` order; the first
    /// threshold that is not exceeded wins. Zero-probability entries are never
    /// picked; rounding leftovers go to the last reachable state.
    pub fn next_state(&self, from: DoorState, u: f64) -> DoorState {
        let mut acc = 0.0;
        let mut last = from;
        for (to, p) in DoorState::ALL.iter().zip(self.row(from)) {
            if *p <= 0.0 {
                continue;
            }
            acc += p;
            last = *to;
            if u <= acc {
                return *to;
            }
        }
        last
    }
}

impl Default for TransitionMatrix {
    fn default() -> Self {
        Self::new([
            // closed -> closed | half-open | open
            [0.4, 0.3, 0.3],
            // half-open -> ...
            [0.8, 0.1, 0.1],
            // open -> ...
            [0.7, 0.1, 0.2],
        ])
    }
}

/// Inclusive range of whole seconds a door rests in a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellRange {
    pub min_secs: u32,
    pub max_secs: u32,
}

impl DwellRange {
    pub const fn new(min_secs: u32, max_secs: u32) -> Self {
        Self { min_secs, max_secs }
    }
}

/// Dwell ranges per state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellCfg {
    pub closed: DwellRange,
    pub half_open: DwellRange,
    pub open: DwellRange,
}

impl DwellCfg {
    #[inline]
    pub fn range(&self, state: DoorState) -> DwellRange {
        match state {
            DoorState::Closed => self.closed,
            DoorState::HalfOpen => self.half_open,
            DoorState::Open => self.open,
        }
    }
}

impl Default for DwellCfg {
    fn default() -> Self {
        Self {
            closed: DwellRange::new(1, 30),
            half_open: DwellRange::new(2, 8),
            open: DwellRange::new(5, 15),
        }
    }
}

/// Uniform range of real-world movement durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveDuration {
    pub min_s: f64,
    pub max_s: f64,
}

impl MoveDuration {
    pub const fn new(min_s: f64, max_s: f64) -> Self {
        Self { min_s, max_s }
    }
}

/// Movement timing, excluding the dampened tail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampCfg {
    /// Ramps between neighbouring states (closed<->half-open, half-open<->open).
    pub half_span: MoveDuration,
    /// Ramps across the whole range (closed<->open).
    pub full_span: MoveDuration,
}

impl Default for RampCfg {
    fn default() -> Self {
        Self {
            half_span: MoveDuration::new(0.75, 1.25),
            full_span: MoveDuration::new(1.5, 2.5),
        }
    }
}

/// Hard bounds every finished sample sequence must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min_angle: i32,
    pub max_angle: i32,
    /// Largest allowed |v[i] - v[i-1]|; protects the robot arm.
    pub max_step: i32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_angle: DoorState::Closed.rest_angle(),
            max_angle: DoorState::Open.rest_angle(),
            max_step: 100,
        }
    }
}

/// Everything the generator needs besides the random source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub transitions: TransitionMatrix,
    pub dwell: DwellCfg,
    pub ramp: RampCfg,
    pub limits: Limits,
    /// Sampling period in milliseconds.
    pub tick_ms: u32,
    /// Decrement per tick of the closing ramp.
    pub close_rate: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            transitions: TransitionMatrix::default(),
            dwell: DwellCfg::default(),
            ramp: RampCfg::default(),
            limits: Limits::default(),
            tick_ms: 10,
            close_rate: 50,
        }
    }
}

impl SimConfig {
    /// Span of a full closed<->open movement.
    #[inline]
    pub fn full_span(&self) -> i32 {
        DoorState::Open.rest_angle() - DoorState::Closed.rest_angle()
    }

    /// Number of decrement samples in the closing ramp (after its start sample).
    #[inline]
    pub fn closing_len(&self) -> usize {
        (self.full_span() / self.close_rate.max(1)) as usize + 1
    }

    /// Ticks covering `secs` whole seconds. Sub-tick remainders are truncated.
    #[inline]
    pub fn ticks_for_secs(&self, secs: u32) -> usize {
        (u64::from(secs) * 1000 / u64::from(self.tick_ms.max(1))) as usize
    }

    /// Timing used for a ramp covering `span` steps.
    #[inline]
    pub fn move_duration(&self, span: i32) -> MoveDuration {
        if span >= self.full_span() {
            self.ramp.full_span
        } else {
            self.ramp.half_span
        }
    }

    /// Step per tick needed to cover `span` in `duration_ms`, truncated.
    #[inline]
    pub fn increment_for(&self, span: i32, duration_ms: f64) -> i32 {
        ((f64::from(span) / duration_ms) * f64::from(self.tick_ms)).floor() as i32
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.transitions.validate()?;

        if self.tick_ms == 0 {
            return Err(SimError::InvalidTiming("tick_ms must be >= 1".into()));
        }
        if self.limits.min_angle > self.limits.max_angle || self.limits.max_step <= 0 {
            return Err(SimError::InvalidTiming(
                "limits must satisfy min_angle <= max_angle and max_step > 0".into(),
            ));
        }
        if self.close_rate <= 0 || self.close_rate > self.limits.max_step {
            return Err(SimError::InvalidTiming(format!(
                "close_rate must be in 1..={}",
                self.limits.max_step
            )));
        }
        for state in DoorState::ALL {
            let r = self.dwell.range(state);
            if r.min_secs > r.max_secs {
                return Err(SimError::InvalidTiming(format!(
                    "dwell range for '{state}' is empty ({}..={})",
                    r.min_secs, r.max_secs
                )));
            }
        }

        let half = self.full_span() / 2;
        for (span, d) in [
            (half, self.ramp.half_span),
            (self.full_span(), self.ramp.full_span),
        ] {
            if !(d.min_s.is_finite() && d.max_s.is_finite() && d.min_s > 0.0 && d.min_s <= d.max_s)
            {
                return Err(SimError::InvalidTiming(format!(
                    "ramp duration {}..{} s is not a positive range",
                    d.min_s, d.max_s
                )));
            }
            // Fastest draw gives the largest step; it must still be safe.
            let fastest = self.increment_for(span, d.min_s * 1000.0);
            if fastest > self.limits.max_step {
                return Err(SimError::InvalidTiming(format!(
                    "ramp over {span} steps in {} s needs {fastest} steps/tick, limit is {}",
                    d.min_s, self.limits.max_step
                )));
            }
            let slowest = self.increment_for(span, d.max_s * 1000.0);
            if slowest < 1 {
                return Err(SimError::InvalidTiming(format!(
                    "ramp over {span} steps in {} s is slower than one step per tick",
                    d.max_s
                )));
            }
        }
        Ok(())
    }
}
