//! Evalboard leaderboard aggregation
//!
//! This crate folds the artifacts of independent benchmark runs into
//! per-implementation statistics and assembles them into a single
//! leaderboard document.
//!
//! # Features
//!
//! - **Run-Set Aggregation**: pass@1 mean/std across runs, pass@k and pass^k
//!   over the tasks observed in every run, token and turn averages
//! - **Pricing**: per-run cost estimates from an injectable pricing table
//! - **Artifact Loading**: discovery of `group/implementation/run-N` trees
//!   with per-record degradation instead of hard failures
//! - **Report Generation**: JSON, Markdown, and terminal table output
//!
//! # Example
//!
//! ```rust,ignore
//! use evalboard_core::{ArtifactLoader, EvalboardConfig, LeaderboardBuilder, RunSetAggregator};
//!
//! let config = EvalboardConfig::default().with_k(3);
//! let implementations = ArtifactLoader::new(&config).discover()?;
//! let aggregator = RunSetAggregator::new(config.pricing_resolver()?);
//! let report = LeaderboardBuilder::new(aggregator, config.k).build(&implementations);
//! evalboard_core::report::write_report(&report, &config.output)?;
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod pricing;
pub mod report;

// Re-exports for convenience
pub use config::EvalboardConfig;
pub use error::{EvalboardError, EvalboardResult};
pub use loader::{ArtifactLoader, ImplementationRuns};
pub use metrics::{
    AggregatedMetrics, CrossRunPass, PassAt1, RunArtifacts, RunSetAggregator, RunSummary,
    TaskOutcome, TaskResult,
};
pub use pricing::{ModelPricing, PricingResolver, PricingTable};
pub use report::{LeaderboardBuilder, Report, ReportFormat};
