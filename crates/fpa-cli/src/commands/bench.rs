use anyhow::{Context, Result};
use fpa_cli::cli::{BenchFunction, OptimizerArgs, OutputFormat};
use fpa_core::{Bounds, FlowerPollination, FpaConfig, FpaSolution};
use serde::Serialize;

#[derive(Serialize)]
struct BenchReport<'a> {
    function: &'a str,
    dims: usize,
    #[serde(flatten)]
    solution: &'a FpaSolution,
}

pub fn handle(
    function: BenchFunction,
    dims: usize,
    lower: f64,
    upper: f64,
    optimizer: &OptimizerArgs,
    format: OutputFormat,
) -> Result<()> {
    let bounds = Bounds::uniform(dims, lower, upper).context("invalid benchmark bounds")?;
    let config = optimizer.apply(FpaConfig::default());
    let fpa = FlowerPollination::new(config, bounds)?;
    let mut objective = |x: &[f64]| function.evaluate(x);
    let solution = fpa.run(&mut objective)?;

    match format {
        OutputFormat::Json => {
            let report = BenchReport {
                function: function.as_str(),
                dims,
                solution: &solution,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            println!("function: {}", function.as_str());
            println!("best fitness: {}", solution.fitness);
            let position = solution
                .position
                .iter()
                .map(|v| format!("{v:.6}"))
                .collect::<Vec<_>>()
                .join(", ");
            println!("best position: [{position}]");
            println!(
                "evaluations: {} (global {}, local {}, improved {})",
                solution.evaluations,
                solution.global_moves,
                solution.local_moves,
                solution.improvements
            );
        }
    }
    Ok(())
}
