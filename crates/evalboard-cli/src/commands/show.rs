//! Render a previously written leaderboard

use std::path::Path;

use anyhow::{Context, Result};
use evalboard_core::report::generate_report;
use evalboard_core::{Report, ReportFormat};
use tracing::debug;

/// Show a leaderboard document in the requested format
pub fn run(path: &Path, format: &str) -> Result<()> {
    let format: ReportFormat = format.parse()?;
    let report = Report::from_file(path)
        .with_context(|| format!("Failed to read leaderboard {:?}", path))?;
    debug!(
        "Loaded leaderboard {:?} with {} implementations",
        path,
        report.implementation_count()
    );

    println!("{}", generate_report(&report, format)?);
    Ok(())
}
