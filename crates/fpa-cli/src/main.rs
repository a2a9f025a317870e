use clap::Parser;
use fpa_cli::cli::{build_cli_command, Cli, Commands};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match &cli.command {
        Some(Commands::Optimize {
            config,
            out,
            simulator,
            optimizer,
        }) => commands::optimize::handle(config, out.as_deref(), simulator.as_deref(), optimizer),
        Some(Commands::Taps {
            event_log,
            regulators,
        }) => commands::taps::handle(event_log, regulators),
        Some(Commands::Discover { dss_file }) => commands::discover::handle(dss_file),
        Some(Commands::Bench {
            function,
            dims,
            lower,
            upper,
            format,
            optimizer,
        }) => commands::bench::handle(*function, *dims, *lower, *upper, optimizer, *format),
        Some(Commands::Completions { shell, out }) => {
            commands::completions::handle(*shell, out.as_deref())
        }
        None => {
            let _ = build_cli_command().print_help();
            println!();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
