mod cli;
mod csv_sink;
mod error_fmt;
mod generate;
mod logging;

use std::path::{Path, PathBuf};

use clap::Parser;
use eyre::WrapErr;
use tracing_appender::non_blocking::WorkerGuard;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG_PATH, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::generate::{Overrides, run_generate};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    let mut log_guard = None;
    if let Err(err) = run(cli, &mut log_guard) {
        tracing::error!(error = %format!("{err:#}"), "run failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        let code = exit_code_for_error(&err);
        // process::exit skips destructors; flush the file log first.
        drop(log_guard);
        std::process::exit(code);
    }
}

fn run(cli: Cli, log_guard: &mut Option<WorkerGuard>) -> eyre::Result<()> {
    let cfg = load_config(cli.config.as_deref())?;

    let level = cli
        .log_level
        .clone()
        .or_else(|| cfg.logging.level.clone())
        .unwrap_or_else(|| "info".to_string());
    *log_guard = logging::init_tracing(cli.json, &level, &cfg.logging)?;

    match cli.cmd {
        Commands::Generate {
            output,
            seed,
            iterations,
            horizon_ticks,
            print_runtime,
        } => {
            let ov = Overrides {
                output,
                seed,
                iterations,
                horizon_ticks,
            };
            tracing::info!("processing");
            let summary = run_generate(&cfg, &ov)?;
            if cli.json {
                println!("{}", summary.to_json());
            } else {
                println!(
                    "File written: {} ({} rows, {} doors)",
                    summary.path.display(),
                    summary.rows,
                    summary.doors
                );
                if print_runtime {
                    println!(
                        "Total execution time: {:.1} seconds",
                        summary.elapsed_ms as f64 / 1000.0
                    );
                }
            }
        }
        Commands::CheckConfig => {
            door_core::Generator::new(door_core::SimConfig::default())?;
            if cli.json {
                println!("{}", serde_json::json!({ "status": "ok" }));
            } else {
                println!("config ok");
            }
        }
    }
    Ok(())
}

/// Load and validate the config. Without `--config`, a missing default file
/// means built-in defaults.
fn load_config(explicit: Option<&Path>) -> eyre::Result<door_config::Config> {
    let cfg = match explicit {
        Some(path) => door_config::load_file(path).wrap_err("invalid configuration")?,
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if path.exists() {
                door_config::load_file(&path).wrap_err("invalid configuration")?
            } else {
                door_config::Config::default()
            }
        }
    };
    cfg.validate().wrap_err("invalid configuration")?;
    Ok(cfg)
}
