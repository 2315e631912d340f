//! Human-readable error descriptions and structured JSON error formatting.

use door_core::SimError;

/// Exit code for configuration problems (file, TOML values or motion constants).
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when generated samples break a safety gate.
pub const EXIT_INVARIANT: i32 = 3;
/// Exit code when the run is shorter than the requested horizon.
pub const EXIT_HORIZON: i32 = 4;

/// Stable machine-readable name for an error.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(se) = err.downcast_ref::<SimError>() {
        return match se {
            SimError::TransitionRowSum { .. } => "TransitionRowSum",
            SimError::InvalidTiming(_) => "InvalidTiming",
            SimError::AngleOutOfRange { .. } => "AngleOutOfRange",
            SimError::ExcessiveStep { .. } => "ExcessiveStep",
            SimError::HorizonExceedsSamples { .. } => "HorizonExceedsSamples",
            SimError::EmptyDoorSet => "EmptyDoorSet",
        };
    }
    if is_config_error(err) {
        return "InvalidConfig";
    }
    "Error"
}

fn is_config_error(err: &eyre::Report) -> bool {
    err.chain().any(|e| {
        let lower = e.to_string().to_ascii_lowercase();
        lower.contains("invalid configuration")
            || lower.starts_with("parse config")
            || lower.starts_with("read config")
    })
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(se) = err.downcast_ref::<SimError>() {
        return match se {
            SimError::TransitionRowSum { state, sum } => format!(
                "What happened: Transition probabilities out of '{state}' sum to {sum}, not 1.0.\nLikely causes: The built-in transition matrix was edited incorrectly.\nHow to fix: Make every row of the matrix sum to exactly 1.0 and rebuild."
            ),
            SimError::InvalidTiming(msg) => format!(
                "What happened: Motion constants are unsafe ({msg}).\nLikely causes: Ramp durations, dwell ranges or limits were edited incorrectly.\nHow to fix: Restore the motion constants so the fastest ramp stays within the step limit."
            ),
            SimError::AngleOutOfRange { .. } | SimError::ExcessiveStep { .. } => format!(
                "What happened: Generated trace failed a safety gate: {se}.\nLikely causes: A bug in the ramp or closing-ramp math.\nHow to fix: Nothing was written. Re-run with --seed to reproduce and report the seed."
            ),
            SimError::HorizonExceedsSamples { .. } => format!(
                "What happened: {se}.\nLikely causes: Too few transitions for the requested horizon.\nHow to fix: Raise simulation.iterations (or --iterations) or lower simulation.horizon_ticks."
            ),
            SimError::EmptyDoorSet => "What happened: No doors to simulate.\nLikely causes: simulation.doors is empty.\nHow to fix: List at least one door id in the config.".to_string(),
        };
    }

    let msg = format!("{err:#}");
    if is_config_error(err) {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: Missing file, malformed TOML or out-of-range values.\nHow to fix: Edit the config file (see etc/doorgen.toml), then rerun."
        );
    }

    let lower = msg.to_ascii_lowercase();
    if lower.contains("create output") || lower.contains("write frame") {
        return format!(
            "What happened: Could not write the output file ({msg}).\nLikely causes: Missing directory or no write permission.\nHow to fix: Check output.path (or --output) and directory permissions."
        );
    }

    format!(
        "Something went wrong.\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Map errors to stable exit codes; anything unclassified returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(se) = err.downcast_ref::<SimError>() {
        return match se {
            SimError::TransitionRowSum { .. } | SimError::InvalidTiming(_) => EXIT_CONFIG,
            SimError::EmptyDoorSet => EXIT_CONFIG,
            SimError::AngleOutOfRange { .. } | SimError::ExcessiveStep { .. } => EXIT_INVARIANT,
            SimError::HorizonExceedsSamples { .. } => EXIT_HORIZON,
        };
    }
    if is_config_error(err) {
        return EXIT_CONFIG;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_violations_map_to_exit_3() {
        let err: eyre::Report = SimError::ExcessiveStep {
            door: "d1".into(),
            index: 4,
            prev: 0,
            next: 500,
            max_step: 100,
        }
        .into();
        assert_eq!(exit_code_for_error(&err), EXIT_INVARIANT);
        assert_eq!(reason_name(&err), "ExcessiveStep");
        assert!(humanize(&err).contains("Nothing was written"));
    }

    #[test]
    fn horizon_shortfall_maps_to_exit_4() {
        let err: eyre::Report = SimError::HorizonExceedsSamples {
            door: "d2".into(),
            needed: 10,
            available: 3,
        }
        .into();
        assert_eq!(exit_code_for_error(&err), EXIT_HORIZON);
        assert!(humanize(&err).contains("simulation.iterations"));
    }

    #[test]
    fn wrapped_config_errors_map_to_exit_2() {
        let err = eyre::eyre!("simulation.iterations must be >= 1").wrap_err("invalid configuration");
        assert_eq!(exit_code_for_error(&err), EXIT_CONFIG);
        assert_eq!(reason_name(&err), "InvalidConfig");
        assert!(humanize(&err).contains("iterations must be >= 1"));
    }

    #[test]
    fn json_errors_are_objects() {
        let err = eyre::eyre!("boom");
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Error");
        assert_eq!(v["exit_code"], 1);
    }
}
