//! Port to the external circuit simulator.
//!
//! The optimizer never talks to the simulator directly: [`TapObjective`]
//! drives a [`FeederSimulator`], and [`OpenDssProcess`] implements it by
//! running the OpenDSS command-line engine on a generated script.
//!
//! [`TapObjective`]: crate::TapObjective

use std::fs;
use std::path::{self, Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use crate::dss::{daily_script, DssSettings};
use crate::error::{SimulatorError, SimulatorResult};

/// Default OpenDSS command-line binary looked up on PATH.
pub const DEFAULT_SIMULATOR_BINARY: &str = "opendsscmd";

/// A feeder model that can simulate one day under given PV power factors.
///
/// Implementations are stateful and must not be driven concurrently.
pub trait FeederSimulator {
    /// PV systems in the order power factors are supplied.
    fn pv_systems(&self) -> &[String];

    /// Simulate one day with `power_factors[k]` applied to `pv_systems()[k]`
    /// and export the event log to `event_log`.
    fn run_daily(&mut self, power_factors: &[f64], event_log: &Path) -> Result<()>;
}

/// Locate the simulator binary: explicit path first, then PATH.
pub fn find_simulator(explicit: Option<&Path>) -> SimulatorResult<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        // A bare name like "opendsscmd" is resolved through PATH below.
        if path.components().count() > 1 {
            return Err(SimulatorError::MissingBinary(path.to_path_buf()));
        }
    }
    let name = explicit
        .and_then(|p| p.to_str())
        .unwrap_or(DEFAULT_SIMULATOR_BINARY);
    which::which(name).map_err(|_| SimulatorError::NotInstalled {
        binary: name.to_string(),
    })
}

/// Runs OpenDSS as a child process, one process per simulated day.
///
/// The child runs inside `work_dir`, so every path handed to it (binary,
/// master file, script, event log) is made absolute first.
pub struct OpenDssProcess {
    binary: PathBuf,
    master: PathBuf,
    pv_systems: Vec<String>,
    settings: DssSettings,
    work_dir: PathBuf,
}

impl OpenDssProcess {
    pub fn new(
        binary: PathBuf,
        master: PathBuf,
        pv_systems: Vec<String>,
        settings: DssSettings,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            binary: absolute_or_same(binary),
            master: absolute_or_same(master),
            pv_systems,
            settings,
            work_dir: absolute_or_same(work_dir),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn master(&self) -> &Path {
        &self.master
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn script_path(&self) -> PathBuf {
        self.work_dir.join("fpa_daily.dss")
    }

    fn execute(&self, script: &Path) -> SimulatorResult<()> {
        let output = Command::new(&self.binary)
            .arg(script)
            .current_dir(&self.work_dir)
            .output()
            .map_err(SimulatorError::ProcessStart)?;
        if !output.status.success() {
            return Err(SimulatorError::ProcessFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

// Relative paths only fail to resolve when empty; those are kept and rejected
// later by the process spawn.
fn absolute_or_same(path: PathBuf) -> PathBuf {
    path::absolute(&path).unwrap_or(path)
}

impl FeederSimulator for OpenDssProcess {
    fn pv_systems(&self) -> &[String] {
        &self.pv_systems
    }

    fn run_daily(&mut self, power_factors: &[f64], event_log: &Path) -> Result<()> {
        if power_factors.len() != self.pv_systems.len() {
            return Err(SimulatorError::SetpointCount {
                expected: self.pv_systems.len(),
                actual: power_factors.len(),
            }
            .into());
        }
        fs::create_dir_all(&self.work_dir)
            .with_context(|| format!("creating work directory '{}'", self.work_dir.display()))?;

        let setpoints: Vec<(&str, f64)> = self
            .pv_systems
            .iter()
            .map(String::as_str)
            .zip(power_factors.iter().copied())
            .collect();
        let event_log = path::absolute(event_log)
            .with_context(|| format!("resolving event log path '{}'", event_log.display()))?;
        let script = daily_script(&self.master, &self.settings, &setpoints, &event_log);
        let script_path = self.script_path();
        fs::write(&script_path, script)
            .with_context(|| format!("writing DSS script '{}'", script_path.display()))?;

        let start = Instant::now();
        self.execute(&script_path)
            .with_context(|| format!("running {} on {}", self.binary.display(), self.master.display()))?;
        debug!(
            "Simulated day for {} PV systems in {} ms",
            self.pv_systems.len(),
            start.elapsed().as_millis()
        );
        Ok(())
    }
}
