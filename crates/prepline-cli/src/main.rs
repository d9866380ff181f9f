//! Prepline CLI - clean and encode tabular data for model training.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose turns on debug logs.
    let default_filter = if cli.verbose { "prepline=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Run {
            file,
            output,
            format,
            cleaned_output,
            store,
            table,
            if_exists,
        } => commands::run::run(
            file,
            output,
            format,
            cleaned_output,
            store,
            table,
            if_exists,
            config,
            cli.verbose,
        ),

        Commands::Clean {
            file,
            output,
            format,
        } => commands::clean::run(file, output, format, config, cli.verbose),

        Commands::Transform {
            file,
            output,
            format,
        } => commands::transform::run(file, output, format, config, cli.verbose),

        Commands::Preview { file, rows } => {
            commands::preview::run(file, rows, config, cli.verbose)
        }

        Commands::Serve { port, host } => commands::serve::run(host, port, config, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
