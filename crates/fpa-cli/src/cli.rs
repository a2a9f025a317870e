use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use fpa_core::FpaConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fpa", author, version, about = "Flower pollination search for PV power-factor setpoints", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search PV power factors that minimize regulator tap operations
    Optimize {
        /// Study configuration (TOML or JSON)
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: PathBuf,
        /// Override the output directory from the config
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        out: Option<PathBuf>,
        /// Simulator binary (overrides the config)
        #[arg(long, value_hint = ValueHint::ExecutablePath)]
        simulator: Option<PathBuf>,
        #[command(flatten)]
        optimizer: OptimizerArgs,
    },
    /// Count regulator tap operations in an exported event log
    Taps {
        /// Event log CSV exported by the simulator
        #[arg(value_hint = ValueHint::FilePath)]
        event_log: PathBuf,
        /// Regulator to count (repeatable; defaults to Reg1, Reg2, Reg3)
        #[arg(long = "regulator")]
        regulators: Vec<String>,
    },
    /// List the PV systems defined by a feeder model
    Discover {
        /// Master DSS file
        #[arg(value_hint = ValueHint::FilePath)]
        dss_file: PathBuf,
    },
    /// Run the optimizer on a synthetic test function
    Bench {
        #[arg(long, value_enum, default_value_t = BenchFunction::Sphere)]
        function: BenchFunction,
        /// Number of decision variables
        #[arg(long, default_value_t = 2)]
        dims: usize,
        /// Lower bound for every variable
        #[arg(long, default_value_t = -5.12, allow_negative_numbers = true)]
        lower: f64,
        /// Upper bound for every variable
        #[arg(long, default_value_t = 5.12, allow_negative_numbers = true)]
        upper: f64,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
        #[command(flatten)]
        optimizer: OptimizerArgs,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Command-line overrides for [`FpaConfig`].
#[derive(Args, Debug, Clone, Default)]
pub struct OptimizerArgs {
    /// Population size
    #[arg(long)]
    pub flowers: Option<usize>,
    /// Number of pollination sweeps
    #[arg(long)]
    pub iterations: Option<usize>,
    /// Global pollination step scale
    #[arg(long)]
    pub gamma: Option<f64>,
    /// Lévy exponent, in (0, 2]
    #[arg(long)]
    pub lambda: Option<f64>,
    /// Probability of a global move
    #[arg(long = "switch-probability")]
    pub switch_probability: Option<f64>,
    /// Fitness used to reject candidates
    #[arg(long)]
    pub rejection_sentinel: Option<f64>,
    /// RNG seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

impl OptimizerArgs {
    pub fn apply(&self, mut config: FpaConfig) -> FpaConfig {
        if let Some(flowers) = self.flowers {
            config.flowers = flowers;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(gamma) = self.gamma {
            config.gamma = gamma;
        }
        if let Some(lambda) = self.lambda {
            config.lambda = lambda;
        }
        if let Some(p) = self.switch_probability {
            config.switch_probability = p;
        }
        if let Some(sentinel) = self.rejection_sentinel {
            config.rejection_sentinel = sentinel;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchFunction {
    /// Σ xᵢ², minimum 0 at the origin
    Sphere,
    /// Σ xᵢ, minimum at the lower corner
    Sum,
    /// 10n + Σ (xᵢ² − 10 cos 2πxᵢ), minimum 0 at the origin
    Rastrigin,
}

impl BenchFunction {
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        match self {
            BenchFunction::Sphere => x.iter().map(|v| v * v).sum(),
            BenchFunction::Sum => x.iter().sum(),
            BenchFunction::Rastrigin => {
                10.0 * x.len() as f64
                    + x.iter()
                        .map(|v| v * v - 10.0 * (2.0 * std::f64::consts::PI * v).cos())
                        .sum::<f64>()
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BenchFunction::Sphere => "sphere",
            BenchFunction::Sum => "sum",
            BenchFunction::Rastrigin => "rastrigin",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn overrides_only_touch_given_fields() {
        let args = OptimizerArgs {
            flowers: Some(12),
            seed: Some(4),
            ..Default::default()
        };
        let config = args.apply(FpaConfig::default());
        assert_eq!(config.flowers, 12);
        assert_eq!(config.seed, Some(4));
        assert_eq!(config.iterations, 100);
        assert_eq!(config.gamma, 0.1);
    }

    #[test]
    fn bench_functions_have_zero_minimum() {
        assert_eq!(BenchFunction::Sphere.evaluate(&[0.0, 0.0]), 0.0);
        assert_eq!(BenchFunction::Rastrigin.evaluate(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(BenchFunction::Sum.evaluate(&[1.0, -1.0]), 0.0);
    }

    #[test]
    fn parses_bench_with_negative_bounds() {
        let cli = Cli::try_parse_from([
            "fpa", "bench", "--function", "sum", "--lower", "-1", "--upper", "1", "--seed", "9",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Bench {
                function,
                lower,
                optimizer,
                ..
            }) => {
                assert_eq!(function, BenchFunction::Sum);
                assert_eq!(lower, -1.0);
                assert_eq!(optimizer.seed, Some(9));
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }
}
