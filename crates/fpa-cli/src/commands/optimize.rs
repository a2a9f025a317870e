use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use fpa_cli::cli::OptimizerArgs;
use fpa_feeder::{load_config, run_study, StudyConfig};
use tracing::info;

use crate::commands::telemetry::record_run_timed;

pub fn handle(
    config_path: &Path,
    out: Option<&Path>,
    simulator: Option<&Path>,
    optimizer: &OptimizerArgs,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(out) = out {
        config.output_dir = std::path::absolute(out)
            .with_context(|| format!("resolving output directory '{}'", out.display()))?;
    }
    if let Some(simulator) = simulator {
        config.simulator = Some(simulator.to_path_buf());
    }
    config.optimizer = optimizer.apply(config.optimizer);

    let start = Instant::now();
    let result = optimize(&config);

    let summary_path = config.output_dir.join(fpa_feeder::study::SUMMARY_JSON);
    let config_display = config_path.display().to_string();
    let flowers = config.optimizer.flowers.to_string();
    let iterations = config.optimizer.iterations.to_string();
    let seed = config
        .optimizer
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "entropy".to_string());
    record_run_timed(
        &summary_path,
        "optimize",
        &[
            ("config", config_display.as_str()),
            ("flowers", flowers.as_str()),
            ("iterations", iterations.as_str()),
            ("seed", seed.as_str()),
        ],
        start,
        &result,
    );
    result
}

fn optimize(config: &StudyConfig) -> Result<()> {
    let summary = run_study(config)?;
    info!(
        "Study finished after {} simulations",
        summary.simulations
    );
    println!("reference taps: {}", summary.reference_taps);
    println!("optimal taps: {}", summary.optimal_taps);
    println!("best fitness: {}", summary.best_fitness);
    for row in &summary.setpoints {
        println!("  {} pf={:.4} (raw {:.4})", row.pv_name, row.pf_sanitized, row.pf_raw);
    }
    println!("setpoints written to {}", summary.setpoints_csv.display());
    Ok(())
}
