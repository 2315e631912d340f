//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config path used when `--config` is not given. A missing file here means
/// built-in defaults; a missing file passed explicitly is an error.
pub const DEFAULT_CONFIG_PATH: &str = "etc/doorgen.toml";

#[derive(Parser, Debug)]
#[command(name = "doorgen", version, about = "Door angle trace generator")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log as JSON lines and print results/errors as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins when set
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the door trace and write it as delimited text
    Generate {
        /// Output file (overrides output.path)
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Run seed (overrides simulation.seed); each door derives its own stream
        #[arg(long, value_name = "N")]
        seed: Option<u64>,
        /// Markov transitions per door (overrides simulation.iterations)
        #[arg(long, value_name = "N")]
        iterations: Option<usize>,
        /// Ticks before the closing ramp (overrides simulation.horizon_ticks)
        #[arg(long, value_name = "TICKS")]
        horizon_ticks: Option<usize>,
        /// Print total runtime on completion
        #[arg(long, action = ArgAction::SetTrue)]
        print_runtime: bool,
    },
    /// Validate the config file and the built-in motion constants
    CheckConfig,
}
