use door_core::{
    DoorState, Generator, Limits, Ramp, RunParams, SimConfig, TransitionMatrix, closing_ramp,
    generate_state_sequence, generate_transition_samples, validate,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn state_strategy() -> impl Strategy<Value = DoorState> {
    prop_oneof![
        Just(DoorState::Closed),
        Just(DoorState::HalfOpen),
        Just(DoorState::Open),
    ]
}

proptest! {
    #[test]
    fn ramps_stay_in_range_and_land_on_target(
        from in state_strategy(),
        to in state_strategy(),
        inc in 1i32..=100,
    ) {
        let ramp = Ramp::between(from, to, inc);
        let samples: Vec<i32> = ramp.iter().collect();
        prop_assert_eq!(samples.len(), ramp.len());
        if from == to {
            prop_assert!(samples.is_empty());
        } else {
            prop_assert_eq!(samples[0], from.rest_angle());
            prop_assert_eq!(*samples.last().unwrap(), to.rest_angle());
            // monotone towards the target, never past it
            let dir = (to.rest_angle() - from.rest_angle()).signum();
            for w in samples.windows(2) {
                prop_assert_eq!((w[1] - w[0]).signum(), dir);
                prop_assert!((w[1] - w[0]).abs() <= inc);
            }
            prop_assert!(validate("p", &samples, &Limits::default()).is_ok());
        }
    }

    #[test]
    fn transition_samples_satisfy_invariants(
        from in state_strategy(),
        to in state_strategy(),
        seed in any::<u64>(),
    ) {
        let cfg = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let samples = generate_transition_samples(&cfg, &mut rng, from, to);
        let dwell = cfg.dwell.range(from);
        let min_len = cfg.ticks_for_secs(dwell.min_secs);
        prop_assert!(samples.len() >= min_len);
        prop_assert!(samples[..min_len].iter().all(|v| *v == from.rest_angle()));
        prop_assert_eq!(*samples.last().unwrap(), to.rest_angle());
        prop_assert!(validate("p", &samples, &cfg.limits).is_ok());
    }

    #[test]
    fn closing_ramp_decrements_by_50_then_holds_zero(v0 in 0i32..=6000) {
        let ramp = closing_ramp(v0, 50, 121);
        prop_assert_eq!(ramp.len(), 122);
        prop_assert_eq!(ramp[0], v0);
        for w in ramp.windows(2) {
            if w[0] >= 50 {
                prop_assert_eq!(w[1], w[0] - 50);
            } else {
                prop_assert_eq!(w[1], 0);
            }
        }
        prop_assert_eq!(*ramp.last().unwrap(), 0);
    }

    #[test]
    fn state_sequences_start_closed(count in 0usize..500, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let states = generate_state_sequence(
            &TransitionMatrix::default(),
            &mut rng,
            DoorState::Closed,
            count,
        );
        prop_assert_eq!(states.len(), count + 1);
        prop_assert_eq!(states[0], DoorState::Closed);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn whole_runs_pass_the_safety_gates(seed in any::<u64>(), horizon in 0usize..20_000) {
        let generator = Generator::new(SimConfig::default()).unwrap();
        let params = RunParams {
            iterations: 300,
            horizon_ticks: horizon,
            doors: vec!["d1".into(), "d2".into()],
            seed: Some(seed),
        };
        let sim = generator.run(&params).unwrap();
        prop_assert_eq!(sim.len(), horizon + 1 + 121);
        for d in &sim.doors {
            prop_assert!(d.samples.iter().all(|v| (0..=6000).contains(v)));
            prop_assert!(d.samples.windows(2).all(|w| (w[1] - w[0]).abs() <= 100));
            prop_assert_eq!(*d.samples.last().unwrap(), 0);
        }
    }
}
