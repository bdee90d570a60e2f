mod cli;
mod config;
mod prompt;
mod render;
mod table_ops;

use anyhow::{Result, anyhow};
use clap::Parser;
use cli::{Cli, Commands, merge_config};
use config::PartToolConfig;
use std::process::ExitCode;
use table_ops::Outcome;

fn main() -> ExitCode {
    // Initialize tracing, set log level from environment variable
    // Log level can be controlled by setting the RUST_LOG environment variable, e.g.:
    // RUST_LOG=debug, RUST_LOG=parttool_lib=trace, RUST_LOG=info
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match run(&args) {
        // Conflicts have already been printed.
        Ok(outcome) => ExitCode::from(outcome.exit_status()),
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> Result<Outcome> {
    let config = match &args.config {
        Some(path) => Some(
            PartToolConfig::from_file(path)
                .map_err(|e| anyhow!("Failed to load config file '{}': {}", path, e))?,
        ),
        None => None,
    };
    let merged = merge_config(args, config)?;
    tracing::debug!("using {:?}", merged);

    match &args.command {
        Commands::New(params) => table_ops::execute_new(params, &merged),
        Commands::Show(params) => table_ops::execute_show(params, &merged),
        Commands::Add(params) => table_ops::execute_add(params, &merged),
        Commands::Remove(params) => table_ops::execute_remove(params, &merged),
        Commands::Set(params) => table_ops::execute_set(params, &merged),
        Commands::Layout(params) => table_ops::execute_layout(params, &merged),
        Commands::Usage(params) => table_ops::execute_usage(params, &merged),
        Commands::Codegen(params) => table_ops::execute_codegen(params, &merged),
        Commands::Subtypes => table_ops::execute_subtypes(),
    }
}
