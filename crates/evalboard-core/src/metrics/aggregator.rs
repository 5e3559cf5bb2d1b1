//! Run-set aggregation
//!
//! Folds the run slots of one implementation into summary metrics.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::stats::{mean, population_std_dev, ratio, round_report};
use super::types::{
    AggregatedMetrics, CrossRunPass, PassAt1, RunArtifacts, RunSummary, TaskOutcome,
};
use crate::pricing::PricingResolver;

/// Sums over the present runs, in ascending run order
#[derive(Debug, Default)]
struct RunTotals {
    tasks: u64,
    agent_execution_time: f64,
    input_tokens: u64,
    output_tokens: u64,
    tokens: u64,
    turns: u64,
    successful_tasks: u64,
    /// First non-empty model identifier; later runs never replace it
    model_name: Option<String>,
}

impl RunTotals {
    fn absorb(mut self, summary: &RunSummary) -> Self {
        self.tasks += summary.total_tasks;
        self.agent_execution_time += summary.total_agent_execution_time;
        self.input_tokens += summary.token_usage.total_input_tokens;
        self.output_tokens += summary.token_usage.total_output_tokens;
        self.tokens += summary.token_usage.total_tokens;
        self.turns += summary.turn_usage.total_turns;
        self.successful_tasks += summary.successful_tasks;
        if self.model_name.is_none() {
            self.model_name = summary.model_name().map(str::to_owned);
        }
        self
    }
}

/// Aggregator for computing leaderboard metrics from run artifacts
#[derive(Debug, Clone, Default)]
pub struct RunSetAggregator {
    resolver: PricingResolver,
}

impl RunSetAggregator {
    /// Create a new aggregator
    pub fn new(resolver: PricingResolver) -> Self {
        Self { resolver }
    }

    /// The pricing resolver used for per-run cost
    pub fn resolver(&self) -> &PricingResolver {
        &self.resolver
    }

    /// Aggregate the run slots of one implementation.
    ///
    /// `runs[i]` is run `i + 1`; slots past `requested_k` are ignored. Returns
    /// `None` when no slot holds any data.
    pub fn aggregate(
        &self,
        runs: &[RunArtifacts],
        requested_k: usize,
    ) -> Option<AggregatedMetrics> {
        let present: Vec<&RunArtifacts> = runs
            .iter()
            .take(requested_k)
            .filter(|run| run.is_present())
            .collect();

        let actual_k = present.len();
        if actual_k == 0 {
            return None;
        }
        if actual_k < requested_k {
            debug!("Only {}/{} runs present", actual_k, requested_k);
        }

        let totals = present
            .iter()
            .filter_map(|run| run.summary.as_ref())
            .fold(RunTotals::default(), RunTotals::absorb);
        debug!(
            runs = actual_k,
            tasks = totals.tasks,
            successful = totals.successful_tasks,
            "Accumulated run totals"
        );

        let pass_at_1 = Self::compute_pass_at_1(&present);

        let task_denominator = totals.tasks as f64;
        let runs_f = actual_k as f64;

        let per_run_input_tokens = totals.input_tokens as f64 / runs_f;
        let per_run_output_tokens = totals.output_tokens as f64 / runs_f;
        let actual_model_name = totals.model_name.clone().unwrap_or_default();
        let per_run_cost =
            self.compute_per_run_cost(&actual_model_name, per_run_input_tokens, per_run_output_tokens);

        Some(AggregatedMetrics {
            total_tasks: (totals.tasks as f64 / runs_f).round_ties_even() as u64,
            total_agent_execution_time: totals.agent_execution_time,
            total_input_tokens: totals.input_tokens,
            total_output_tokens: totals.output_tokens,
            total_tokens: totals.tokens,
            total_turns: totals.turns,
            avg_agent_execution_time: round_report(ratio(
                totals.agent_execution_time,
                task_denominator,
            )),
            avg_input_tokens: round_report(ratio(totals.input_tokens as f64, task_denominator)),
            avg_output_tokens: round_report(ratio(totals.output_tokens as f64, task_denominator)),
            avg_total_tokens: round_report(ratio(totals.tokens as f64, task_denominator)),
            avg_turns: round_report(ratio(totals.turns as f64, task_denominator)),
            per_run_input_tokens: round_report(per_run_input_tokens),
            per_run_output_tokens: round_report(per_run_output_tokens),
            per_run_cost: per_run_cost.map(round_report),
            actual_model_name,
            pass_at_1,
            cross_run: Self::compute_cross_run_pass(&present),
        })
    }

    /// Mean and population std of the per-run success rates, in run order
    fn compute_pass_at_1(present: &[&RunArtifacts]) -> PassAt1 {
        let per_run: Vec<f64> = present
            .iter()
            .map(|run| run.summary.as_ref().map_or(0.0, RunSummary::pass_at_1))
            .collect();

        PassAt1 {
            avg: round_report(mean(&per_run)),
            std: round_report(population_std_dev(&per_run)),
        }
    }

    fn compute_per_run_cost(&self, model: &str, input_tokens: f64, output_tokens: f64) -> Option<f64> {
        if model.is_empty() {
            warn!("No model name recorded in any run; per-run cost left empty");
            return None;
        }

        let cost = self.resolver.cost(model, input_tokens, output_tokens);
        if cost.is_none() {
            warn!("No pricing for model '{}'; per-run cost left empty", model);
        }
        cost
    }

    /// pass@k / pass^k over every task id seen in any run.
    ///
    /// A task contributes one outcome per run it appears in; runs where it is
    /// absent are skipped rather than counted as failures.
    fn compute_cross_run_pass(present: &[&RunArtifacts]) -> Option<CrossRunPass> {
        let k = present.len();
        if k <= 1 {
            return None;
        }

        let task_ids: BTreeSet<&str> = present
            .iter()
            .filter_map(|run| run.tasks.as_ref())
            .flat_map(|tasks| tasks.keys().map(String::as_str))
            .collect();

        let unique_tasks = task_ids.len();
        if unique_tasks == 0 {
            return None;
        }

        let mut passed_any = 0usize;
        let mut passed_all = 0usize;
        for task_id in task_ids {
            let observed: Vec<TaskOutcome> =
                present.iter().filter_map(|run| run.outcome(task_id)).collect();
            if observed.iter().any(TaskOutcome::is_success) {
                passed_any += 1;
            }
            if !observed.is_empty() && observed.iter().all(TaskOutcome::is_success) {
                passed_all += 1;
            }
        }

        let total = unique_tasks as f64;
        Some(CrossRunPass::new(
            k,
            round_report(passed_any as f64 / total),
            round_report(passed_all as f64 / total),
        ))
    }
}
