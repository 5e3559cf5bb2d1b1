//! Metrics types and run-set aggregation
//!
//! This module folds the runs of one implementation into a single
//! [`AggregatedMetrics`] leaderboard entry.

mod aggregator;
pub mod stats;
mod types;

pub use aggregator::RunSetAggregator;
pub use types::{
    AggregatedMetrics, CrossRunPass, ExecutionResult, ModelConfig, PassAt1, RunArtifacts,
    RunSummary, TaskOutcome, TaskResult, TokenUsage, TurnUsage,
};
