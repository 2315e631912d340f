//! Motion profile: hold the current angle, then ramp to the next one.
//!
//! A ramp covers its span in three segments with decreasing speed:
//!
//! | segment | share of span | step per tick |
//! |---------|---------------|---------------|
//! | 1       | first 90 %    | `inc`         |
//! | 2       | next 5 %      | `inc / 2`     |
//! | 3       | last 5 %      | `inc / 4`     |
//!
//! Each segment starts exactly on its boundary and stops before the next
//! one, so samples never overshoot. The exact target is appended last.
//! Segment lengths are closed-form; nothing accumulates until a break
//! condition happens to hold.

use rand::Rng;

use crate::config::SimConfig;
use crate::state::DoorState;

/// Boundary of the full-speed segment, in twentieths of the span.
const FULL_SPEED_END: i32 = 18;
/// Boundary of the half-speed segment, in twentieths of the span.
const HALF_SPEED_END: i32 = 19;

/// A straight walk from `start` towards `end` (exclusive) with a fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: i32,
    pub end: i32,
    pub step: i32,
}

impl Segment {
    /// Number of samples: `ceil(|end - start| / step)`.
    #[inline]
    pub fn len(&self) -> usize {
        let dist = (self.end - self.start).abs();
        let step = self.step.max(1);
        ((dist + step - 1) / step) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn samples(self) -> impl Iterator<Item = i32> + Clone {
        let dir = (self.end - self.start).signum();
        let step = self.step.max(1);
        let n = self.len() as i32;
        (0..n).map(move |k| self.start + dir * k * step)
    }
}

/// Three-segment dampened ramp between two angles.
///
/// `Ramp` is `Copy`; `iter()` can be called any number of times and always
/// yields the same samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp {
    from: i32,
    to: i32,
    inc: i32,
}

impl Ramp {
    /// `inc` below 1 is raised to 1 so every segment makes progress.
    pub fn new(from: i32, to: i32, inc: i32) -> Self {
        Self {
            from,
            to,
            inc: inc.max(1),
        }
    }

    pub fn between(from: DoorState, to: DoorState, inc: i32) -> Self {
        Self::new(from.rest_angle(), to.rest_angle(), inc)
    }

    #[inline]
    pub fn span(&self) -> i32 {
        (self.to - self.from).abs()
    }

    pub fn segments(&self) -> [Segment; 3] {
        let dir = (self.to - self.from).signum();
        let span = self.span();
        let b1 = self.from + dir * span * FULL_SPEED_END / 20;
        let b2 = self.from + dir * span * HALF_SPEED_END / 20;
        [
            Segment {
                start: self.from,
                end: b1,
                step: self.inc,
            },
            Segment {
                start: b1,
                end: b2,
                step: (self.inc / 2).max(1),
            },
            Segment {
                start: b2,
                end: self.to,
                step: (self.inc / 4).max(1),
            },
        ]
    }

    /// Total samples including the final target; 0 when `from == to`.
    pub fn len(&self) -> usize {
        if self.from == self.to {
            return 0;
        }
        self.segments().iter().map(Segment::len).sum::<usize>() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn iter(self) -> impl Iterator<Item = i32> + Clone {
        let tail = (self.from != self.to).then_some(self.to);
        self.segments()
            .into_iter()
            .flat_map(Segment::samples)
            .chain(tail)
    }
}

/// Draw a dwell length in whole seconds for `state`.
pub fn draw_dwell_secs<R: Rng + ?Sized>(cfg: &SimConfig, rng: &mut R, state: DoorState) -> u32 {
    let r = cfg.dwell.range(state);
    rng.gen_range(r.min_secs..=r.max_secs)
}

/// Draw the full-speed step for a ramp covering `span` steps.
pub fn draw_increment<R: Rng + ?Sized>(cfg: &SimConfig, rng: &mut R, span: i32) -> i32 {
    let d = cfg.move_duration(span);
    let duration_ms = rng.gen_range(d.min_s..=d.max_s) * 1000.0;
    cfg.increment_for(span, duration_ms)
}

/// All random choices for one state transition, fixed up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: DoorState,
    pub to: DoorState,
    pub dwell_secs: u32,
    /// Full-speed step; unused when `from == to`.
    pub inc: i32,
}

impl TransitionPlan {
    /// Draw the dwell, then (for a real move) the ramp speed.
    pub fn draw<R: Rng + ?Sized>(
        cfg: &SimConfig,
        rng: &mut R,
        from: DoorState,
        to: DoorState,
    ) -> Self {
        let dwell_secs = draw_dwell_secs(cfg, rng, from);
        let inc = if from == to {
            0
        } else {
            let span = (to.rest_angle() - from.rest_angle()).abs();
            draw_increment(cfg, rng, span)
        };
        Self {
            from,
            to,
            dwell_secs,
            inc,
        }
    }

    #[inline]
    pub fn dwell_ticks(&self, cfg: &SimConfig) -> usize {
        cfg.ticks_for_secs(self.dwell_secs)
    }

    pub fn ramp(&self) -> Option<Ramp> {
        (self.from != self.to).then(|| Ramp::between(self.from, self.to, self.inc))
    }

    /// Exact number of samples `samples()` yields.
    pub fn len(&self, cfg: &SimConfig) -> usize {
        self.dwell_ticks(cfg) + self.ramp().map_or(0, |r| r.len())
    }

    pub fn samples(&self, cfg: &SimConfig) -> impl Iterator<Item = i32> + Clone + use<> {
        let hold = std::iter::repeat_n(self.from.rest_angle(), self.dwell_ticks(cfg));
        hold.chain(self.ramp().into_iter().flat_map(|r| r.iter()))
    }

    /// Append this transition's samples to `out`.
    pub fn extend_into(&self, cfg: &SimConfig, out: &mut Vec<i32>) {
        out.reserve(self.len(cfg));
        out.extend(self.samples(cfg));
    }
}

/// Samples for one transition: dwell at `from`, then ramp to `to` if it differs.
pub fn generate_transition_samples<R: Rng + ?Sized>(
    cfg: &SimConfig,
    rng: &mut R,
    from: DoorState,
    to: DoorState,
) -> Vec<i32> {
    let plan = TransitionPlan::draw(cfg, rng, from, to);
    let mut out = Vec::with_capacity(plan.len(cfg));
    plan.extend_into(cfg, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use DoorState::*;

    #[test]
    fn closed_to_open_at_inc_100() {
        let ramp = Ramp::between(Closed, Open, 100);
        let got: Vec<i32> = ramp.iter().collect();

        let mut want: Vec<i32> = (0..54).map(|k| k * 100).collect();
        want.extend((0..6).map(|k| 5400 + k * 50));
        want.extend((0..12).map(|k| 5700 + k * 25));
        want.push(6000);

        assert_eq!(got, want);
        assert_eq!(ramp.len(), want.len());
    }

    #[test]
    fn open_to_closed_mirrors_boundaries() {
        let got: Vec<i32> = Ramp::between(Open, Closed, 100).iter().collect();
        assert_eq!(got[0], 6000);
        assert_eq!(got[53], 700);
        assert_eq!(&got[54..60], &[600, 550, 500, 450, 400, 350]);
        assert_eq!(got[60], 300);
        assert_eq!(got[71], 25);
        assert_eq!(*got.last().unwrap(), 0);
        assert_eq!(got.len(), 73);
    }

    #[test]
    fn uneven_increment_snaps_to_boundaries() {
        let got: Vec<i32> = Ramp::between(Closed, HalfOpen, 37).iter().collect();
        assert!(got.contains(&2700));
        assert!(got.contains(&2850));
        assert_eq!(*got.last().unwrap(), 3000);
        assert!(got.windows(2).all(|w| w[1] > w[0] && w[1] - w[0] <= 37));
    }

    #[test]
    fn half_open_to_open_uses_span_relative_segments() {
        let segs = Ramp::between(HalfOpen, Open, 30).segments();
        assert_eq!((segs[0].start, segs[0].end, segs[0].step), (3000, 5700, 30));
        assert_eq!((segs[1].start, segs[1].end, segs[1].step), (5700, 5850, 15));
        assert_eq!((segs[2].start, segs[2].end, segs[2].step), (5850, 6000, 7));
    }

    #[test]
    fn ramp_is_restartable() {
        let ramp = Ramp::between(Open, HalfOpen, 33);
        let a: Vec<i32> = ramp.iter().collect();
        let b: Vec<i32> = ramp.iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn same_angle_ramp_is_empty() {
        let ramp = Ramp::new(3000, 3000, 40);
        assert!(ramp.is_empty());
        assert_eq!(ramp.len(), 0);
        assert_eq!(ramp.iter().count(), 0);
    }

    #[test]
    fn tiny_increment_still_terminates() {
        let ramp = Ramp::new(0, 3000, 1);
        assert_eq!(ramp.iter().count(), ramp.len());
        assert_eq!(ramp.iter().last(), Some(3000));
    }

    #[test]
    fn dwell_only_when_state_repeats() {
        let cfg = SimConfig::default();
        let plan = TransitionPlan {
            from: HalfOpen,
            to: HalfOpen,
            dwell_secs: 4,
            inc: 0,
        };
        let got: Vec<i32> = plan.samples(&cfg).collect();
        assert_eq!(got.len(), 400);
        assert!(got.iter().all(|v| *v == 3000));
        assert!(plan.ramp().is_none());
    }

    #[test]
    fn dwell_precedes_ramp() {
        let cfg = SimConfig::default();
        let plan = TransitionPlan {
            from: Open,
            to: HalfOpen,
            dwell_secs: 5,
            inc: 40,
        };
        let got: Vec<i32> = plan.samples(&cfg).collect();
        assert_eq!(got.len(), plan.len(&cfg));
        assert!(got[..500].iter().all(|v| *v == 6000));
        assert_eq!(got[500], 6000);
        assert_eq!(*got.last().unwrap(), 3000);
    }
}
