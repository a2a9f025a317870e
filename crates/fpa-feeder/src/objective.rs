//! Tap-count objective: fewer regulator tap operations over a simulated day.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fpa_core::{Objective, ObjectiveError};
use tracing::{debug, info};

use crate::event_log::count_tap_operations;
use crate::power_factor::sanitize_all;
use crate::simulator::FeederSimulator;

const REFERENCE_LOG: &str = "EventLog_ref_temp.csv";
const CANDIDATE_LOG: &str = "FPA_EventLog.csv";

/// Scores a vector of raw power factors by the tap operations it causes.
///
/// The reference day (every PV at unity power factor) is simulated once and
/// cached. A candidate causing more taps than the reference scores
/// `rejection_sentinel`; otherwise it scores its tap count.
pub struct TapObjective<S> {
    simulator: S,
    work_dir: PathBuf,
    regulators: Vec<String>,
    rejection_sentinel: f64,
    reference_taps: Option<usize>,
    simulations: usize,
}

impl<S: FeederSimulator> TapObjective<S> {
    pub fn new(
        simulator: S,
        work_dir: impl Into<PathBuf>,
        regulators: Vec<String>,
        rejection_sentinel: f64,
    ) -> Self {
        Self {
            simulator,
            work_dir: work_dir.into(),
            regulators,
            rejection_sentinel,
            reference_taps: None,
            simulations: 0,
        }
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    /// Days simulated so far, reference included.
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// Tap operations with every PV at unity power factor.
    pub fn reference_taps(&mut self) -> Result<usize> {
        if let Some(taps) = self.reference_taps {
            return Ok(taps);
        }
        let unity = vec![1.0; self.simulator.pv_systems().len()];
        let log = self.work_dir.join(REFERENCE_LOG);
        let taps = self
            .simulate(&unity, &log)
            .context("simulating the unity power factor reference day")?;
        info!("Reference day: {} tap operations at unity power factor", taps);
        self.reference_taps = Some(taps);
        Ok(taps)
    }

    /// Sanitize `raw` power factors, simulate a day and count taps in the
    /// event log written to `event_log`.
    pub fn count_taps(&mut self, raw: &[f64], event_log: &Path) -> Result<usize> {
        let power_factors = sanitize_all(raw);
        self.simulate(&power_factors, event_log)
    }

    /// Fitness of `raw`: tap count, or the sentinel if worse than the reference.
    pub fn score(&mut self, raw: &[f64]) -> Result<f64> {
        let reference = self.reference_taps()?;
        let log = self.work_dir.join(CANDIDATE_LOG);
        let taps = self.count_taps(raw, &log)?;
        debug!("Candidate taps {} (reference {})", taps, reference);
        if taps > reference {
            Ok(self.rejection_sentinel)
        } else {
            Ok(taps as f64)
        }
    }

    fn simulate(&mut self, power_factors: &[f64], event_log: &Path) -> Result<usize> {
        if let Some(parent) = event_log.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating event log directory '{}'", parent.display()))?;
        }
        if event_log.exists() {
            fs::remove_file(event_log)
                .with_context(|| format!("removing stale event log '{}'", event_log.display()))?;
        }
        self.simulator.run_daily(power_factors, event_log)?;
        self.simulations += 1;
        count_tap_operations(event_log, &self.regulators)
    }
}

impl<S: FeederSimulator> Objective for TapObjective<S> {
    fn evaluate(&mut self, x: &[f64]) -> Result<f64, ObjectiveError> {
        self.score(x).map_err(Into::into)
    }
}
