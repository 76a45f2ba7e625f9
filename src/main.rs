use std::process::ExitCode;

use clap::Parser;
use console::style;
use pdfmind::Settings;
use pdfmind::cli::commands::{chunk, init, process, stats};
use pdfmind::cli::{Cli, Commands};
use pdfmind::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        // A file named on the command line must load
        Some(path) => match Settings::load_required(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{} {e}", style("Error:").red().bold());
                return ExitCode::FAILURE;
            }
        },
        None => Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            eprintln!("Using default configuration for now.");
            Settings::default()
        }),
    };

    logging::init_with_config(&settings.logging);

    let result = match &cli.command {
        Commands::Init { force } => std::env::current_dir()
            .map_err(anyhow::Error::from)
            .and_then(|root| init::run_init(&root, *force)),
        Commands::Config => init::run_config(&settings),
        Commands::Process(args) => process::run(args, &settings),
        Commands::Chunk(args) => chunk::run(args, &settings),
        Commands::Stats(args) => stats::run(args, &settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", style("Error:").red().bold());
            ExitCode::FAILURE
        }
    }
}
