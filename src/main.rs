//! Cairn - Versioned Artifact Fetcher
//!
//! CLI entry point that dispatches to subcommands.

use cairn::cli::{Cli, Commands};
use cairn::config::ConfigManager;
use cairn::error::CairnResult;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> CairnResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("cairn=warn"),
        1 => EnvFilter::new("cairn=info"),
        _ => EnvFilter::new("cairn=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Completions don't need configuration
    if let Commands::Completions(args) = cli.command {
        return cairn::cli::commands::completions(args);
    }

    let manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = manager.load()?;

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Fetch(args) => cairn::cli::commands::fetch(args, &config),
        Commands::Cache(args) => cairn::cli::commands::cache(args, &config),
        Commands::Config(args) => cairn::cli::commands::config(args, &manager, &config),
    }
}
