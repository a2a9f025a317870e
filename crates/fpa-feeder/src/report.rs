//! Study outputs: optimal setpoint table and run summary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use fpa_core::FpaSolution;
use serde::{Deserialize, Serialize};

use crate::power_factor::sanitize_pf;

/// One row of the optimal setpoint table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetpointRow {
    pub pv_name: String,
    pub pf_raw: f64,
    pub pf_sanitized: f64,
}

pub fn setpoint_rows(pv_systems: &[String], raw: &[f64]) -> Result<Vec<SetpointRow>> {
    if pv_systems.len() != raw.len() {
        return Err(anyhow!(
            "{} PV systems but {} power factors",
            pv_systems.len(),
            raw.len()
        ));
    }
    Ok(pv_systems
        .iter()
        .zip(raw)
        .map(|(name, pf)| SetpointRow {
            pv_name: name.clone(),
            pf_raw: *pf,
            pf_sanitized: sanitize_pf(*pf),
        })
        .collect())
}

/// Write `pv_name,pf_raw,pf_sanitized` rows to `path`.
pub fn write_setpoints_csv(path: &Path, rows: &[SetpointRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory '{}'", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating setpoint CSV '{}'", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing setpoint row for {}", row.pv_name))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing setpoint CSV '{}'", path.display()))?;
    Ok(())
}

pub fn read_setpoints_csv(path: &Path) -> Result<Vec<SetpointRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening setpoint CSV '{}'", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<SetpointRow>, _>>()
        .with_context(|| format!("parsing setpoint CSV '{}'", path.display()))
}

/// Everything a finished study produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySummary {
    pub created_at: DateTime<Utc>,
    pub dss_file: PathBuf,
    pub setpoints: Vec<SetpointRow>,
    /// Taps with every PV at unity power factor.
    pub reference_taps: usize,
    /// Best fitness reported by the optimizer.
    pub best_fitness: f64,
    /// Taps counted when re-simulating the day with the optimal setpoints.
    pub optimal_taps: usize,
    pub simulations: usize,
    pub solution: FpaSolution,
    pub event_log: PathBuf,
    pub setpoints_csv: PathBuf,
}

pub fn write_summary(path: &Path, summary: &StudySummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serializing study summary to JSON")?;
    fs::write(path, json).with_context(|| format!("writing study summary '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn setpoint_csv_has_raw_and_sanitized_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("optimal_pf.csv");
        let rows = setpoint_rows(&["pv1".into(), "pv2".into()], &[0.42, -0.97]).unwrap();
        write_setpoints_csv(&path, &rows).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next().unwrap(), "pv_name,pf_raw,pf_sanitized");
        assert_eq!(read_setpoints_csv(&path).unwrap(), rows);
        assert_eq!(rows[0].pf_sanitized, 0.90);
        assert_eq!(rows[1].pf_sanitized, -0.97);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(setpoint_rows(&["pv1".into()], &[0.9, 0.95]).is_err());
    }
}
