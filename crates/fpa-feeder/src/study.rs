//! End-to-end study: search power factors, then re-simulate the winner.

use std::fs;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use fpa_core::{Bounds, FlowerPollination};
use tracing::info;

use crate::config::StudyConfig;
use crate::dss::discover_pv_systems;
use crate::objective::TapObjective;
use crate::report::{setpoint_rows, write_setpoints_csv, write_summary, StudySummary};
use crate::simulator::{find_simulator, FeederSimulator, OpenDssProcess};

pub const OPTIMAL_EVENT_LOG: &str = "EventLog_optimal_pf.csv";
pub const SETPOINTS_CSV: &str = "optimal_pf.csv";
pub const SUMMARY_JSON: &str = "study_summary.json";

/// Build the OpenDSS-backed simulator described by `config`.
pub fn open_dss_simulator(config: &StudyConfig) -> Result<OpenDssProcess> {
    let binary = find_simulator(config.simulator.as_deref())?;
    let pv_systems = if config.pv_systems.is_empty() {
        discover_pv_systems(&config.dss_file)?
    } else {
        config.pv_systems.clone()
    };
    info!(
        "Feeder {} has {} PV systems",
        config.dss_file.display(),
        pv_systems.len()
    );
    Ok(OpenDssProcess::new(
        binary,
        config.dss_file.clone(),
        pv_systems,
        config.dss_settings(),
        config.work_dir(),
    ))
}

/// Run a study against OpenDSS.
pub fn run_study(config: &StudyConfig) -> Result<StudySummary> {
    let simulator = open_dss_simulator(config)?;
    run_study_with(config, simulator)
}

/// Run a study against any simulator.
pub fn run_study_with<S: FeederSimulator>(config: &StudyConfig, simulator: S) -> Result<StudySummary> {
    config.validate()?;
    let pv_systems = simulator.pv_systems().to_vec();
    if pv_systems.is_empty() {
        return Err(anyhow!(
            "no PV systems to tune in {}",
            config.dss_file.display()
        ));
    }
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "creating study output directory '{}'",
            config.output_dir.display()
        )
    })?;

    let bounds = Bounds::uniform(pv_systems.len(), config.pf_min, config.pf_max)?;
    let fpa = FlowerPollination::new(config.optimizer.clone(), bounds)?;
    let mut objective = TapObjective::new(
        simulator,
        config.work_dir(),
        config.regulators.clone(),
        config.optimizer.rejection_sentinel,
    );

    let reference_taps = objective.reference_taps()?;
    info!(
        "Searching {} power factors with {} flowers x {} iterations",
        pv_systems.len(),
        config.optimizer.flowers,
        config.optimizer.iterations
    );
    let solution = fpa.run(&mut objective).context("flower pollination search failed")?;
    info!("Best fitness (tap operations) = {:.2}", solution.fitness);

    let event_log = config.output_dir.join(OPTIMAL_EVENT_LOG);
    let optimal_taps = objective
        .count_taps(&solution.position, &event_log)
        .context("re-simulating the day with the optimal power factors")?;
    info!(
        "Optimal power factors give {} tap operations (reference {}); event log {}",
        optimal_taps,
        reference_taps,
        event_log.display()
    );

    let setpoints = setpoint_rows(&pv_systems, &solution.position)?;
    let setpoints_csv = config.output_dir.join(SETPOINTS_CSV);
    write_setpoints_csv(&setpoints_csv, &setpoints)?;

    let summary = StudySummary {
        created_at: Utc::now(),
        dss_file: config.dss_file.clone(),
        setpoints,
        reference_taps,
        best_fitness: solution.fitness,
        optimal_taps,
        simulations: objective.simulations(),
        solution,
        event_log,
        setpoints_csv,
    };
    write_summary(&config.output_dir.join(SUMMARY_JSON), &summary)?;
    Ok(summary)
}
