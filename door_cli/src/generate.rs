//! `generate`: config mapping, simulation and output.

use std::io::Write;
use std::path::{Path, PathBuf};

use door_core::error::Result as CoreResult;
use door_core::{Generator, RunParams, SimConfig};
use door_traits::{Clock, MonotonicClock};

use crate::csv_sink::CsvSink;

/// CLI overrides for the `[simulation]`/`[output]` sections.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub seed: Option<u64>,
    pub iterations: Option<usize>,
    pub horizon_ticks: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub doors: usize,
    pub seed: Option<u64>,
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "path": self.path.display().to_string(),
            "rows": self.rows,
            "doors": self.doors,
            "seed": self.seed,
            "elapsed_ms": self.elapsed_ms,
        })
        .to_string()
    }
}

/// Merge CLI overrides into the configured run parameters.
pub fn run_params(cfg: &door_config::Config, ov: &Overrides) -> CoreResult<RunParams> {
    let mut params: RunParams = cfg.into();
    if let Some(seed) = ov.seed {
        params.seed = Some(seed);
    }
    if let Some(n) = ov.iterations {
        if n == 0 {
            eyre::bail!("invalid configuration: --iterations must be >= 1");
        }
        params.iterations = n;
    }
    if let Some(t) = ov.horizon_ticks {
        params.horizon_ticks = t;
    }
    Ok(params)
}

/// Simulate, check, then write. Nothing is written when a gate fails.
pub fn run_generate(cfg: &door_config::Config, ov: &Overrides) -> CoreResult<RunSummary> {
    let generator = Generator::new(SimConfig::default())?;
    run_generate_with(cfg, ov, &generator, &MonotonicClock::new())
}

pub fn run_generate_with(
    cfg: &door_config::Config,
    ov: &Overrides,
    generator: &Generator,
    clock: &impl Clock,
) -> CoreResult<RunSummary> {
    let t0 = clock.now();
    let params = run_params(cfg, ov)?;
    let path = ov
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.output.path));

    let sim = generator.run(&params)?;

    write_output(&path, &cfg.output, &sim)?;
    let elapsed_ms = clock.ms_since(t0);
    let columns: Vec<&str> = sim.door_ids().collect();
    tracing::info!(
        path = %path.display(),
        rows = sim.len(),
        columns = ?columns,
        elapsed_ms,
        "file written"
    );

    Ok(RunSummary {
        path,
        rows: sim.len(),
        doors: sim.doors.len(),
        seed: params.seed,
        elapsed_ms,
    })
}

fn write_output(
    path: &Path,
    out: &door_config::Output,
    sim: &door_core::Simulation,
) -> CoreResult<()> {
    let mut sink = CsvSink::create(path, out)?;
    sim.write_to(&mut sink)?;
    tracing::debug!(rows = sink.rows(), "rows flushed");
    let mut file = sink.into_inner()?;
    file.flush()
        .map_err(|e| eyre::eyre!("flush output {:?}: {}", path, e))?;
    Ok(())
}
