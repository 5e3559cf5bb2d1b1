//! Build the leaderboard from run artifacts

use anyhow::{Context, Result};
use colored::*;
use tracing::{debug, info, warn};
use evalboard_core::report::{generate_report, write_report};
use evalboard_core::{
    ArtifactLoader, EvalboardConfig, LeaderboardBuilder, Report, ReportFormat, RunSetAggregator,
};

use crate::args::AggregateArgs;
use crate::console::CliConsole;
use crate::progress::AggregationProgress;

/// Merge the optional config file with command-line overrides
pub fn load_config(args: &AggregateArgs) -> Result<EvalboardConfig> {
    let mut config = match &args.config {
        Some(path) => EvalboardConfig::from_file(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => EvalboardConfig::default(),
    };

    if let Some(dir) = &args.results_dir {
        config = config.with_results_dir(dir);
    }
    if let Some(k) = args.k {
        config = config.with_k(k);
    }
    if let Some(output) = &args.output {
        config = config.with_output(output);
    }
    if let Some(pricing_file) = &args.pricing_file {
        config = config.with_pricing_file(pricing_file);
    }
    if !args.server_groups.is_empty() {
        config = config.with_server_groups(args.server_groups.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Run the aggregate command
pub fn run(args: AggregateArgs, verbose: bool) -> Result<()> {
    let console = CliConsole::new(verbose);
    let format: ReportFormat = args.format.parse()?;
    let config = load_config(&args)?;
    debug!(?config, "Resolved aggregate configuration");

    console.info(&format!(
        "Scanning {:?} for up to {} runs per implementation",
        config.results_dir, config.k
    ));

    let resolver = config
        .pricing_resolver()
        .context("Failed to build pricing table")?;
    let implementations = ArtifactLoader::new(&config)
        .discover()
        .with_context(|| format!("Failed to read results directory {:?}", config.results_dir))?;

    info!(
        "Discovered {} implementations under {:?}",
        implementations.len(),
        config.results_dir
    );
    if implementations.is_empty() {
        warn!("No implementations under {:?}", config.results_dir);
        console.warn("No implementations found; writing an empty leaderboard");
    }

    let progress = AggregationProgress::new(implementations.len(), args.quiet);
    let mut builder = LeaderboardBuilder::new(RunSetAggregator::new(resolver), config.k);
    builder.set_progress_callback(progress.callback());
    let report = builder.build(&implementations);
    progress.finish();

    write_report(&report, &config.output)
        .with_context(|| format!("Failed to write leaderboard to {:?}", config.output))?;

    if !args.quiet {
        println!("{}", generate_report(&report, format)?);
    }

    console.success(&summary_line(&report, implementations.len(), &config));
    Ok(())
}

fn summary_line(report: &Report, discovered: usize, config: &EvalboardConfig) -> String {
    let included = report.implementation_count();
    let omitted = discovered.saturating_sub(included);
    let mut line = format!(
        "Leaderboard written to {} ({} implementations in {} server groups",
        config.output.display(),
        included,
        report.leaderboard.len()
    );
    if omitted > 0 {
        line.push_str(&format!(", {} without runs", omitted.to_string().yellow()));
    }
    line.push(')');
    line
}
