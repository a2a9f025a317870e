//! Tap objective and study runner against an in-process feeder stand-in.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use fpa_core::{FpaConfig, Objective};
use fpa_feeder::{
    read_setpoints_csv, run_study_with, FeederSimulator, StudyConfig, StudySummary, TapObjective,
};
use tempfile::tempdir;

const SENTINEL: f64 = 1e9;

/// Taps grow with the distance of each |pf| from 0.95; leading power
/// factors (negative) add 30 taps per inverter.
struct SyntheticFeeder {
    pv_systems: Vec<String>,
    runs: usize,
    fail_after: Option<usize>,
}

impl SyntheticFeeder {
    fn new(count: usize) -> Self {
        Self {
            pv_systems: (1..=count).map(|k| format!("pv{k}")).collect(),
            runs: 0,
            fail_after: None,
        }
    }

    fn taps_for(power_factors: &[f64]) -> usize {
        4 + power_factors
            .iter()
            .map(|pf| {
                let penalty = if *pf < 0.0 { 30 } else { 0 };
                penalty + (4000.0 * (pf.abs() - 0.95).powi(2)).round() as usize
            })
            .sum::<usize>()
    }
}

impl FeederSimulator for SyntheticFeeder {
    fn pv_systems(&self) -> &[String] {
        &self.pv_systems
    }

    fn run_daily(&mut self, power_factors: &[f64], event_log: &Path) -> Result<()> {
        self.runs += 1;
        if matches!(self.fail_after, Some(limit) if self.runs > limit) {
            return Err(anyhow!("solution did not converge at step 1432"));
        }
        let mut log = String::from("Hour=0, Sec=0, ControlIter=0, Element=Solution, Action=START\n");
        for step in 0..Self::taps_for(power_factors) {
            log.push_str(&format!(
                "Hour={}, Sec=30, ControlIter=1, Element=Regcontrol.Reg{}, Action= CHANGED 1 TAP(S)\n",
                step / 4,
                step % 3 + 1
            ));
        }
        fs::write(event_log, log)?;
        Ok(())
    }
}

fn objective(dir: &Path, pvs: usize) -> TapObjective<SyntheticFeeder> {
    TapObjective::new(
        SyntheticFeeder::new(pvs),
        dir.join("work"),
        vec!["Reg1".into(), "Reg2".into(), "Reg3".into()],
        SENTINEL,
    )
}

#[test]
fn reference_day_is_simulated_once() {
    let dir = tempdir().unwrap();
    let mut obj = objective(dir.path(), 2);
    assert_eq!(obj.reference_taps().unwrap(), 24);
    assert_eq!(obj.reference_taps().unwrap(), 24);
    assert_eq!(obj.simulations(), 1);
    assert_eq!(obj.simulator().runs, 1);
}

#[test]
fn scores_taps_and_rejects_worse_than_reference() {
    let dir = tempdir().unwrap();
    let mut obj = objective(dir.path(), 2);

    assert_eq!(obj.evaluate(&[0.95, 0.95]).unwrap(), 4.0);
    // 0.3 sanitizes to 0.90: same taps as the reference, which is still accepted.
    assert_eq!(obj.evaluate(&[0.3, 1.0]).unwrap(), 24.0);
    assert_eq!(obj.evaluate(&[-0.95, 0.95]).unwrap(), SENTINEL);
    assert_eq!(obj.simulations(), 4);
}

#[test]
fn stale_event_logs_do_not_leak_between_runs() {
    let dir = tempdir().unwrap();
    let mut obj = objective(dir.path(), 1);
    let log = dir.path().join("day.csv");
    fs::write(&log, "Element=Regcontrol.Reg1 TAP\n".repeat(500)).unwrap();
    assert_eq!(obj.count_taps(&[0.95], &log).unwrap(), 4);
}

#[test]
fn study_writes_reports_for_the_best_setpoints() {
    let dir = tempdir().unwrap();
    let mut config = StudyConfig::for_feeder(dir.path().join("Master.dss"));
    config.output_dir = dir.path().join("out");
    // Lagging power factors only, so every candidate is at or below the reference.
    config.pf_min = 0.0;
    config.optimizer = FpaConfig::default()
        .with_flowers(10)
        .with_iterations(15)
        .with_seed(1);

    let summary = run_study_with(&config, SyntheticFeeder::new(3)).unwrap();

    assert_eq!(summary.reference_taps, 34);
    assert!(summary.best_fitness <= 34.0);
    assert_eq!(summary.optimal_taps as f64, summary.best_fitness);
    assert_eq!(summary.simulations, 1 + 10 + 10 * 15 + 1);
    assert!(summary.event_log.exists());

    let rows = read_setpoints_csv(&summary.setpoints_csv).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].pv_name, "pv1");
    assert!(rows.iter().all(|r| r.pf_sanitized.abs() >= 0.9));

    let json = fs::read_to_string(config.output_dir.join("study_summary.json")).unwrap();
    let parsed: StudySummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.optimal_taps, summary.optimal_taps);
}

#[test]
fn simulator_failure_aborts_the_study() {
    let dir = tempdir().unwrap();
    let mut config = StudyConfig::for_feeder(dir.path().join("Master.dss"));
    config.output_dir = dir.path().join("out");
    config.optimizer = FpaConfig::default()
        .with_flowers(5)
        .with_iterations(5)
        .with_seed(2);
    let mut feeder = SyntheticFeeder::new(2);
    feeder.fail_after = Some(8);

    let err = run_study_with(&config, feeder).unwrap_err();
    let text = format!("{err:#}");
    assert!(text.contains("did not converge"), "{text}");
    assert!(text.contains("sweep 1"), "{text}");
    assert!(!config.output_dir.join("optimal_pf.csv").exists());
}
