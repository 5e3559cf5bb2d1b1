//! Leaderboard assembly and report generation
//!
//! Builds the [`Report`] document and renders it as JSON, Markdown, or a
//! terminal table.

mod json;
mod markdown;
mod table;

pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use table::TableReporter;

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EvalboardError, EvalboardResult};
use crate::loader::ImplementationRuns;
use crate::metrics::{AggregatedMetrics, RunSetAggregator};

/// The consolidated leaderboard document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Requested run count
    pub k: usize,

    /// Server group -> implementation -> metrics
    pub leaderboard: BTreeMap<String, BTreeMap<String, AggregatedMetrics>>,
}

impl Report {
    /// Create an empty report stamped with the current time
    pub fn new(k: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            k,
            leaderboard: BTreeMap::new(),
        }
    }

    /// Add one implementation's metrics
    pub fn insert(
        &mut self,
        server_group: impl Into<String>,
        implementation: impl Into<String>,
        metrics: AggregatedMetrics,
    ) {
        self.leaderboard
            .entry(server_group.into())
            .or_default()
            .insert(implementation.into(), metrics);
    }

    /// Look up one entry
    pub fn get(&self, server_group: &str, implementation: &str) -> Option<&AggregatedMetrics> {
        self.leaderboard.get(server_group)?.get(implementation)
    }

    /// Number of implementations across all groups
    pub fn implementation_count(&self) -> usize {
        self.leaderboard.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.leaderboard.is_empty()
    }

    /// Implementations of one group, best mean pass@1 first, ties by name
    pub fn ranked(&self, server_group: &str) -> Vec<(&str, &AggregatedMetrics)> {
        let mut entries: Vec<(&str, &AggregatedMetrics)> = self
            .leaderboard
            .get(server_group)
            .map(|group| group.iter().map(|(name, m)| (name.as_str(), m)).collect())
            .unwrap_or_default();

        entries.sort_by(|a, b| {
            b.1.pass_rate()
                .total_cmp(&a.1.pass_rate())
                .then_with(|| a.0.cmp(b.0))
        });
        entries
    }

    /// Read a previously written report
    pub fn from_file(path: impl AsRef<Path>) -> EvalboardResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| EvalboardError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| EvalboardError::parse(path, e))
    }
}

/// Callback for progress updates while building a leaderboard
pub type ProgressCallback = Box<dyn Fn(BuildProgress) + Send + Sync>;

/// Progress update while building a leaderboard
#[derive(Debug, Clone)]
pub struct BuildProgress {
    /// Current implementation index (0-based)
    pub current: usize,
    /// Total number of implementations
    pub total: usize,
    /// Server group of the current implementation
    pub server_group: String,
    /// Current implementation
    pub implementation: String,
    /// Whether the implementation made it into the report
    pub included: bool,
}

/// Drives one aggregation per implementation and collects the results
pub struct LeaderboardBuilder {
    aggregator: RunSetAggregator,
    requested_k: usize,
    progress_callback: Option<ProgressCallback>,
}

impl LeaderboardBuilder {
    pub fn new(aggregator: RunSetAggregator, requested_k: usize) -> Self {
        Self {
            aggregator,
            requested_k,
            progress_callback: None,
        }
    }

    /// Set progress callback
    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.progress_callback = Some(callback);
    }

    /// Aggregate every implementation; those without data are omitted
    pub fn build(&self, implementations: &[ImplementationRuns]) -> Report {
        let mut report = Report::new(self.requested_k);
        let total = implementations.len();

        for (current, entry) in implementations.iter().enumerate() {
            let metrics = self.aggregator.aggregate(&entry.runs, self.requested_k);
            let included = metrics.is_some();

            match metrics {
                Some(metrics) => {
                    report.insert(&entry.server_group, &entry.implementation, metrics)
                }
                None => debug!(
                    "No valid runs for {}/{}; omitted",
                    entry.server_group, entry.implementation
                ),
            }

            self.emit_progress(BuildProgress {
                current,
                total,
                server_group: entry.server_group.clone(),
                implementation: entry.implementation.clone(),
                included,
            });
        }

        report
    }

    fn emit_progress(&self, progress: BuildProgress) {
        if let Some(callback) = &self.progress_callback {
            callback(progress);
        }
    }
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
    Table,
}

impl FromStr for ReportFormat {
    type Err = EvalboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "table" => Ok(ReportFormat::Table),
            _ => Err(EvalboardError::UnknownFormat(s.to_string())),
        }
    }
}

/// Generate a report in the specified format
pub fn generate_report(report: &Report, format: ReportFormat) -> EvalboardResult<String> {
    match format {
        ReportFormat::Json => JsonReporter::generate(report),
        ReportFormat::Markdown => Ok(MarkdownReporter::generate(report)),
        ReportFormat::Table => Ok(TableReporter::generate(report)),
    }
}

/// Write the JSON document, creating parent directories as needed
pub fn write_report(report: &Report, path: impl AsRef<Path>) -> EvalboardResult<()> {
    let path = path.as_ref();
    let json = JsonReporter::generate(report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| EvalboardError::io(parent, e))?;
    }
    std::fs::write(path, json).map_err(|e| EvalboardError::io(path, e))?;

    info!(
        "Wrote leaderboard with {} implementations to {:?}",
        report.implementation_count(),
        path
    );
    Ok(())
}
