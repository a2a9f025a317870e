pub mod cli;
pub mod manifest;

pub use cli::{build_cli_command, BenchFunction, Cli, Commands, OptimizerArgs, OutputFormat};
