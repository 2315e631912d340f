#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the door trace generator.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - Every section has defaults, so an empty file (or no file at all) yields
//!   the one-hour, six-door lab run.
//! - Motion constants (transition matrix, dwell ranges, ramp timing) are not
//!   part of this schema; they live in `door_core::SimConfig`.
use serde::Deserialize;
use std::path::Path;

/// Default door ids, one column each in the output.
pub const DEFAULT_DOORS: [&str; 6] = ["d1", "d2", "d3", "d4", "d5", "d6"];

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Simulation {
    /// Number of Markov transitions generated per door.
    pub iterations: usize,
    /// Simulated ticks written before the closing ramp (10 ms each).
    pub horizon_ticks: usize,
    /// Door ids, in output column order.
    pub doors: Vec<String>,
    /// Run seed; each door derives its own stream from it. Absent = OS entropy.
    pub seed: Option<u64>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            iterations: 5000,
            // 1 hour at 10 ms
            horizon_ticks: 360_000,
            doors: DEFAULT_DOORS.iter().map(|d| (*d).to_string()).collect(),
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Output {
    pub path: String,
    /// Field delimiter; must be a single ASCII character.
    pub delimiter: String,
    /// Replaces every '.' in rendered values (consumer expects German locale).
    pub decimal_separator: String,
    /// Empty fields appended to every row for columns the consumer expects.
    pub trailing_columns: usize,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            path: "Lab_6doors_1h.csv".to_string(),
            delimiter: ";".to_string(),
            decimal_separator: ",".to_string(),
            trailing_columns: 6,
        }
    }
}

impl Output {
    /// The delimiter as a byte, if it is a single ASCII character.
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Some(*b),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub simulation: Simulation,
    pub output: Output,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file. Parse errors keep the file path in context.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Simulation
        if self.simulation.iterations == 0 {
            eyre::bail!("simulation.iterations must be >= 1");
        }
        if self.simulation.doors.is_empty() {
            eyre::bail!("simulation.doors must name at least one door");
        }
        for (i, id) in self.simulation.doors.iter().enumerate() {
            if id.trim().is_empty() {
                eyre::bail!("simulation.doors[{i}] must not be empty");
            }
            if self.simulation.doors[..i].contains(id) {
                eyre::bail!("simulation.doors contains duplicate id '{id}'");
            }
        }

        // Output
        if self.output.path.trim().is_empty() {
            eyre::bail!("output.path must not be empty");
        }
        let Some(delim) = self.output.delimiter_byte() else {
            eyre::bail!("output.delimiter must be a single ASCII character");
        };
        if self.output.decimal_separator.is_empty() {
            eyre::bail!("output.decimal_separator must not be empty");
        }
        if self.output.decimal_separator.as_bytes().contains(&delim) {
            eyre::bail!("output.decimal_separator must differ from output.delimiter");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref() {
            if !matches!(rot, "never" | "daily" | "hourly") {
                eyre::bail!("logging.rotation must be one of never|daily|hourly, got '{rot}'");
            }
        }

        Ok(())
    }
}
