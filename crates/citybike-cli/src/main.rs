//! CityBike CLI - clean bike-sharing fleet data and report on it.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            data_dir,
            config,
            top_n,
            outlier_method,
            threshold,
            strict_schema,
            json,
            output,
        } => commands::analyze::run(commands::analyze::AnalyzeArgs {
            data_dir,
            config,
            top_n,
            outlier_method,
            threshold,
            strict_schema,
            json,
            output,
            verbose: cli.verbose,
        }),

        Commands::Clean {
            data_dir,
            output_dir,
            config,
            strict_schema,
        } => commands::clean::run(data_dir, output_dir, config, strict_schema),

        Commands::Rejects {
            data_dir,
            config,
            json,
        } => commands::rejects::run(data_dir, config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
