//! Study configuration, loaded from TOML or JSON.
//!
//! ```toml
//! dss_file = "13Bus/IEEE13_v1.dss"
//! output_dir = "out/fpa"
//! regulators = ["Reg1", "Reg2", "Reg3"]
//!
//! [optimizer]
//! flowers = 100
//! iterations = 100
//! seed = 42
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use fpa_core::FpaConfig;
use serde::{Deserialize, Serialize};

use crate::dss::DssSettings;
use crate::event_log::DEFAULT_REGULATORS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Master DSS file of the feeder model.
    pub dss_file: PathBuf,
    /// PV systems to tune, in order. Empty means discover them from `dss_file`.
    #[serde(default)]
    pub pv_systems: Vec<String>,
    #[serde(default = "default_voltage_bases")]
    pub voltage_bases: Vec<f64>,
    #[serde(default = "default_control_mode")]
    pub control_mode: String,
    #[serde(default = "default_daily_steps")]
    pub daily_steps: usize,
    /// Regulators whose tap operations are counted.
    #[serde(default = "default_regulators")]
    pub regulators: Vec<String>,
    /// Search interval for each raw power factor.
    #[serde(default = "default_pf_min")]
    pub pf_min: f64,
    #[serde(default = "default_pf_max")]
    pub pf_max: f64,
    /// Simulator binary; looked up on PATH when unset.
    #[serde(default)]
    pub simulator: Option<PathBuf>,
    /// Where the work files and reports go.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub optimizer: FpaConfig,
}

fn default_voltage_bases() -> Vec<f64> {
    DssSettings::default().voltage_bases
}

fn default_control_mode() -> String {
    DssSettings::default().control_mode
}

fn default_daily_steps() -> usize {
    DssSettings::default().daily_steps
}

fn default_regulators() -> Vec<String> {
    DEFAULT_REGULATORS.iter().map(|r| r.to_string()).collect()
}

fn default_pf_min() -> f64 {
    -1.0
}

fn default_pf_max() -> f64 {
    1.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("fpa-output")
}

impl StudyConfig {
    /// Config with defaults for everything but the feeder model.
    pub fn for_feeder(dss_file: impl Into<PathBuf>) -> Self {
        Self {
            dss_file: dss_file.into(),
            pv_systems: Vec::new(),
            voltage_bases: default_voltage_bases(),
            control_mode: default_control_mode(),
            daily_steps: default_daily_steps(),
            regulators: default_regulators(),
            pf_min: default_pf_min(),
            pf_max: default_pf_max(),
            simulator: None,
            output_dir: default_output_dir(),
            optimizer: FpaConfig::default(),
        }
    }

    pub fn dss_settings(&self) -> DssSettings {
        DssSettings {
            voltage_bases: self.voltage_bases.clone(),
            control_mode: self.control_mode.clone(),
            daily_steps: self.daily_steps,
        }
    }

    /// Working directory for scripts and temporary event logs.
    pub fn work_dir(&self) -> PathBuf {
        self.output_dir.join("work")
    }

    pub fn validate(&self) -> Result<()> {
        if self.pf_min > self.pf_max {
            return Err(anyhow!(
                "pf_min ({}) must not exceed pf_max ({})",
                self.pf_min,
                self.pf_max
            ));
        }
        if self.daily_steps == 0 {
            return Err(anyhow!("daily_steps must be >= 1"));
        }
        if self.regulators.is_empty() {
            return Err(anyhow!("at least one regulator must be listed"));
        }
        self.optimizer.validate()?;
        Ok(())
    }

    /// Resolve relative paths against `base`, the config file's absolute directory.
    fn resolve_paths(&mut self, base: &Path) {
        if self.dss_file.is_relative() {
            self.dss_file = base.join(&self.dss_file);
        }
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
        if let Some(sim) = &self.simulator {
            if sim.components().count() > 1 && sim.is_relative() {
                self.simulator = Some(base.join(sim));
            }
        }
    }
}

/// Load a study config; the format follows the file extension (TOML default).
pub fn load_config(path: &Path) -> Result<StudyConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading study config '{}'", path.display()))?;
    let mut config: StudyConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing study config json")?
        }
        _ => toml::from_str(&data).context("parsing study config toml")?,
    };
    let absolute = std::path::absolute(path)
        .with_context(|| format!("resolving study config path '{}'", path.display()))?;
    let base = absolute.parent().unwrap_or_else(|| Path::new("/"));
    config.resolve_paths(base);
    config.validate()?;
    Ok(config)
}
