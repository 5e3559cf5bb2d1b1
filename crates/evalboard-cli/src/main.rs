//! Evalboard CLI application
//!
//! Builds a leaderboard from a directory tree of benchmark run artifacts.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/evalboard-cli
//! ```
//!
//! # Commands
//!
//! - `evalboard aggregate`: discover runs, aggregate, write the JSON document
//! - `evalboard show <report>`: render a written document as a table or Markdown
//! - `evalboard pricing`: list the effective pricing table

mod args;
mod commands;
mod console;
mod progress;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise warn, or debug with --verbose. Logs go to stderr
    // so stdout stays clean for report output.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    route(cli)
}

/// Route CLI commands to their respective handlers
fn route(cli: Cli) -> Result<()> {
    let verbose = cli.verbose;
    match cli.command {
        Commands::Aggregate(args) => commands::aggregate::run(args, verbose),
        Commands::Show { report, format } => commands::show::run(&report, &format),
        Commands::Pricing {
            config,
            pricing_file,
            replace,
        } => commands::pricing::run(config.as_deref(), pricing_file, replace),
    }
}
