mod agents;
mod cli;
mod config;
mod error;
mod github;
mod release;
mod services;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use config::Overrides;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = Overrides {
        config: cli.config,
        manifest: cli.manifest,
        release_index: cli.release_index,
    };

    let result = match cli.command {
        Some(Commands::Check) => workflow::execute_check(&overrides),
        Some(Commands::Update {
            service,
            interactive,
        }) => workflow::execute_update(&overrides, service.as_deref(), interactive),
        Some(Commands::List) => workflow::execute_list(&overrides),
        None => workflow::execute_summary(&overrides),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "svcup=debug" } else { "warn" }
}
