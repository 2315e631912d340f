//! Concatenate per-transition runs and append the closing ramp.

use rand::Rng;

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::profile::TransitionPlan;
use crate::state::DoorState;

/// Render every adjacent state pair of `states` and concatenate the runs.
pub fn assemble_door<R: Rng + ?Sized>(
    cfg: &SimConfig,
    rng: &mut R,
    states: &[DoorState],
) -> Vec<i32> {
    let plans: Vec<TransitionPlan> = states
        .windows(2)
        .map(|w| TransitionPlan::draw(cfg, rng, w[0], w[1]))
        .collect();
    assemble_plans(cfg, &plans)
}

/// Like `assemble_door`, but stops once at least `needed` samples exist.
///
/// Plans are drawn in the same order as `assemble_door`, so the result is a
/// prefix of what `assemble_door` returns for the same stream.
pub fn assemble_door_until<R: Rng + ?Sized>(
    cfg: &SimConfig,
    rng: &mut R,
    states: &[DoorState],
    needed: usize,
) -> Vec<i32> {
    let mut out = Vec::with_capacity(needed);
    for w in states.windows(2) {
        if out.len() >= needed {
            break;
        }
        TransitionPlan::draw(cfg, rng, w[0], w[1]).extend_into(cfg, &mut out);
    }
    out
}

/// Deterministic half of `assemble_door`, for plans drawn elsewhere.
pub fn assemble_plans(cfg: &SimConfig, plans: &[TransitionPlan]) -> Vec<i32> {
    let total: usize = plans.iter().map(|p| p.len(cfg)).sum();
    let mut out = Vec::with_capacity(total);
    for plan in plans {
        plan.extend_into(cfg, &mut out);
    }
    out
}

/// `start` followed by `len` samples, each `rate` below the previous and
/// never below 0.
pub fn closing_ramp(start: i32, rate: i32, len: usize) -> Vec<i32> {
    let mut out = Vec::with_capacity(len + 1);
    out.push(start);
    let mut v = start;
    for _ in 0..len {
        v = (v - rate).max(0);
        out.push(v);
    }
    out
}

/// Cut `samples` at the horizon and append the return-to-zero ramp.
///
/// The closing ramp starts at the first sample past the horizon, so the
/// junction is an ordinary adjacent pair of the assembled sequence.
pub fn finish_door(
    cfg: &SimConfig,
    door: &str,
    mut samples: Vec<i32>,
    horizon_ticks: usize,
) -> Result<Vec<i32>> {
    let Some(&start) = samples.get(horizon_ticks) else {
        return Err(SimError::HorizonExceedsSamples {
            door: door.to_string(),
            needed: horizon_ticks + 1,
            available: samples.len(),
        }
        .into());
    };
    samples.truncate(horizon_ticks);
    samples.extend(closing_ramp(start, cfg.close_rate, cfg.closing_len()));
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use DoorState::*;

    #[test]
    fn closing_ramp_from_full_open() {
        let ramp = closing_ramp(6000, 50, 121);
        assert_eq!(ramp.len(), 122);
        assert_eq!(ramp[0], 6000);
        assert_eq!(ramp[1], 5950);
        assert_eq!(ramp[120], 0);
        assert_eq!(ramp[121], 0);
    }

    #[test]
    fn closing_ramp_clamps_at_zero() {
        assert_eq!(closing_ramp(120, 50, 5), vec![120, 70, 20, 0, 0, 0]);
    }

    #[test]
    fn two_transition_length_accounting() {
        let cfg = SimConfig::default();
        let plans = [
            TransitionPlan {
                from: Closed,
                to: Closed,
                dwell_secs: 5,
                inc: 0,
            },
            TransitionPlan {
                from: Closed,
                to: HalfOpen,
                dwell_secs: 3,
                inc: 30,
            },
        ];
        let samples = assemble_plans(&cfg, &plans);
        let ramp_len = plans[1].ramp().map_or(0, |r| r.len());
        assert_eq!(samples.len(), 500 + 300 + ramp_len);
        assert!(samples[..800].iter().all(|v| *v == 0));
        assert_eq!(*samples.last().unwrap(), 3000);
    }

    #[test]
    fn assembly_stops_after_enough_samples() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let cfg = SimConfig::default();
        let states = [Closed, Open, HalfOpen, Closed, Open, Closed, HalfOpen];
        let full = assemble_door(&cfg, &mut StdRng::seed_from_u64(4), &states);
        let part = assemble_door_until(&cfg, &mut StdRng::seed_from_u64(4), &states, 1);

        // the first transition alone covers one sample
        let first = TransitionPlan::draw(&cfg, &mut StdRng::seed_from_u64(4), Closed, Open);
        assert_eq!(part.len(), first.len(&cfg));
        assert_eq!(part.as_slice(), &full[..part.len()]);
    }

    #[test]
    fn assembly_until_zero_draws_nothing() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let cfg = SimConfig::default();
        let got = assemble_door_until(&cfg, &mut StdRng::seed_from_u64(1), &[Closed, Open], 0);
        assert!(got.is_empty());
    }

    #[test]
    fn finish_cuts_at_horizon_and_starts_ramp_on_next_sample() {
        let cfg = SimConfig::default();
        let samples: Vec<i32> = (0..50).map(|i| i * 10).collect();
        let done = finish_door(&cfg, "d1", samples, 20).unwrap();
        assert_eq!(done.len(), 20 + 1 + 121);
        assert_eq!(done[19], 190);
        assert_eq!(done[20], 200);
        assert_eq!(done[21], 150);
        assert_eq!(*done.last().unwrap(), 0);
    }

    #[test]
    fn finish_rejects_short_sequences() {
        let cfg = SimConfig::default();
        let err = finish_door(&cfg, "d4", vec![0; 10], 10).unwrap_err();
        let sim = err.downcast_ref::<SimError>().unwrap();
        assert_eq!(
            sim,
            &SimError::HorizonExceedsSamples {
                door: "d4".into(),
                needed: 11,
                available: 10,
            }
        );
    }
}
