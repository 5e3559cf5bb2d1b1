//! Core metric types for run-set aggregation
//!
//! Input records mirror the artifacts written by each benchmark run; the
//! output record is one leaderboard entry.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Token usage block of a run summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenUsage {
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_tokens: u64,
}

/// Turn usage block of a run summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnUsage {
    pub total_turns: u64,
}

/// Model block of a run summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier the run was executed with
    pub litellm_run_model_name: Option<String>,
}

/// Run-level summary (`summary.json`)
///
/// Every missing field defaults to zero or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSummary {
    /// Number of tasks executed in the run
    pub total_tasks: u64,

    /// Wall time spent in the agent, in seconds
    pub total_agent_execution_time: f64,

    /// Token counters
    pub token_usage: TokenUsage,

    /// Turn counters
    pub turn_usage: TurnUsage,

    /// Number of tasks that succeeded
    pub successful_tasks: u64,

    /// Model configuration
    pub model_config: ModelConfig,
}

impl RunSummary {
    /// Model identifier, if one was recorded and is non-empty
    pub fn model_name(&self) -> Option<&str> {
        self.model_config
            .litellm_run_model_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// Success rate of this single run; 0 when no tasks were run
    pub fn pass_at_1(&self) -> f64 {
        if self.total_tasks > 0 {
            (self.successful_tasks as f64 / self.total_tasks as f64).min(1.0)
        } else {
            0.0
        }
    }
}

/// Outcome of a task that was observed in a run
///
/// A task absent from a run has no outcome at all for that run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    Success,
    Failure,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success)
    }
}

/// Execution block of a task metadata record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionResult {
    pub success: Option<bool>,
}

/// Task-level metadata (`meta.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskResult {
    pub execution_result: ExecutionResult,
}

impl TaskResult {
    /// Create a task result with an explicit success flag
    pub fn new(success: bool) -> Self {
        Self {
            execution_result: ExecutionResult {
                success: Some(success),
            },
        }
    }

    /// Check if the task passed; an absent flag counts as failure
    pub fn passed(&self) -> bool {
        self.execution_result.success.unwrap_or(false)
    }

    /// The observed outcome
    pub fn outcome(&self) -> TaskOutcome {
        if self.passed() {
            TaskOutcome::Success
        } else {
            TaskOutcome::Failure
        }
    }
}

/// Everything collected for one run slot
///
/// A slot counts as present when either the summary or the task map was
/// supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunArtifacts {
    /// Run-level summary
    pub summary: Option<RunSummary>,

    /// Task metadata keyed by task identifier
    pub tasks: Option<BTreeMap<String, TaskResult>>,
}

impl RunArtifacts {
    /// A slot with no data
    pub fn missing() -> Self {
        Self::default()
    }

    /// A slot with only a summary
    pub fn from_summary(summary: RunSummary) -> Self {
        Self {
            summary: Some(summary),
            tasks: None,
        }
    }

    /// Attach a task result, creating the task map if needed
    pub fn with_task(mut self, task_id: impl Into<String>, result: TaskResult) -> Self {
        self.tasks
            .get_or_insert_with(BTreeMap::new)
            .insert(task_id.into(), result);
        self
    }

    /// Whether this run contributes to the aggregation
    pub fn is_present(&self) -> bool {
        self.summary.is_some() || self.tasks.is_some()
    }

    /// Outcome of `task_id` in this run, `None` when it was not observed
    pub fn outcome(&self, task_id: &str) -> Option<TaskOutcome> {
        self.tasks
            .as_ref()
            .and_then(|tasks| tasks.get(task_id))
            .map(TaskResult::outcome)
    }

    /// Number of task records observed in this run
    pub fn task_count(&self) -> usize {
        self.tasks.as_ref().map_or(0, BTreeMap::len)
    }
}

/// pass@1 statistics across runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PassAt1 {
    /// Mean of per-run success rates
    pub avg: f64,

    /// Population standard deviation of per-run success rates
    pub std: f64,
}

/// pass@k and pass^k across all observed runs
///
/// Serialized as two keys named after the observed run count, e.g.
/// `"pass@3"` and `"pass^3"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossRunPass {
    /// Number of runs actually observed
    pub k: usize,

    /// Fraction of tasks that succeeded in at least one run
    pub pass_at_k: f64,

    /// Fraction of tasks that succeeded in every run they appeared in
    pub pass_power_k: f64,
}

impl CrossRunPass {
    pub fn new(k: usize, pass_at_k: f64, pass_power_k: f64) -> Self {
        Self {
            k,
            pass_at_k,
            pass_power_k,
        }
    }

    pub fn pass_at_k_key(&self) -> String {
        format!("pass@{}", self.k)
    }

    pub fn pass_power_k_key(&self) -> String {
        format!("pass^{}", self.k)
    }
}

impl Serialize for CrossRunPass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(&self.pass_at_k_key(), &self.pass_at_k)?;
        map.serialize_entry(&self.pass_power_k_key(), &self.pass_power_k)?;
        map.end()
    }
}

/// Split `pass@3` / `pass^3` into the separator and run count
fn parse_cross_run_key(key: &str) -> Option<(char, usize)> {
    let rest = key.strip_prefix("pass")?;
    let mut chars = rest.chars();
    let sep = chars.next().filter(|c| *c == '@' || *c == '^')?;
    let k = chars.as_str().parse().ok()?;
    Some((sep, k))
}

impl CrossRunPass {
    /// Pair up `pass@<k>` and `pass^<k>` entries (k > 1).
    ///
    /// Neither present is `Ok(None)`; one without the other, or two different
    /// run counts, is an error. Keys that are not cross-run keys are ignored.
    pub fn from_entries<'a, I>(entries: I) -> Result<Option<Self>, String>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut at: Option<(usize, f64)> = None;
        let mut power: Option<(usize, f64)> = None;

        for (key, value) in entries {
            match parse_cross_run_key(key) {
                Some(('@', k)) if k > 1 => at = Some((k, value)),
                Some(('^', k)) if k > 1 => power = Some((k, value)),
                _ => {}
            }
        }

        match (at, power) {
            (None, None) => Ok(None),
            (Some((k_at, pass_at_k)), Some((k_power, pass_power_k))) if k_at == k_power => {
                Ok(Some(Self::new(k_at, pass_at_k, pass_power_k)))
            }
            (Some((k, _)), None) => Err(format!("pass@{k} without a matching pass^{k}")),
            (None, Some((k, _))) => Err(format!("pass^{k} without a matching pass@{k}")),
            (Some((k_at, _)), Some((k_power, _))) => Err(format!(
                "pass@{k_at} and pass^{k_power} disagree on the run count"
            )),
        }
    }
}

/// Aggregated metrics for one implementation (one leaderboard entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MetricsDocument")]
pub struct AggregatedMetrics {
    /// Mean tasks per run, `round(sum of run task counts / observed runs)`.
    /// This is not a distinct-task count.
    pub total_tasks: u64,

    /// Agent execution time summed over runs (seconds)
    pub total_agent_execution_time: f64,

    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_tokens: u64,
    pub total_turns: u64,

    /// Per-task averages over the summed task count
    pub avg_agent_execution_time: f64,
    pub avg_input_tokens: f64,
    pub avg_output_tokens: f64,
    pub avg_total_tokens: f64,
    pub avg_turns: f64,

    /// Token totals divided by the observed run count
    pub per_run_input_tokens: f64,
    pub per_run_output_tokens: f64,

    /// Cost of one run in USD; `null` when the model has no pricing
    pub per_run_cost: Option<f64>,

    /// First non-empty model identifier in run order, or empty
    pub actual_model_name: String,

    #[serde(rename = "pass@1")]
    pub pass_at_1: PassAt1,

    /// Only present with more than one observed run and at least one task
    #[serde(flatten)]
    pub cross_run: Option<CrossRunPass>,
}

impl AggregatedMetrics {
    /// Get the mean pass@1 rate
    pub fn pass_rate(&self) -> f64 {
        self.pass_at_1.avg
    }
}

/// Value of an entry not named by [`MetricsDocument`]
#[derive(Deserialize)]
#[serde(untagged)]
enum ExtraValue {
    Number(f64),
    Other(IgnoredAny),
}

/// On-disk form of [`AggregatedMetrics`]. The run-count-named cross-run keys
/// land in `extra` and are paired up in `TryFrom`.
#[derive(Deserialize)]
struct MetricsDocument {
    total_tasks: u64,
    total_agent_execution_time: f64,
    total_input_tokens: u64,
    total_output_tokens: u64,
    total_tokens: u64,
    total_turns: u64,
    avg_agent_execution_time: f64,
    avg_input_tokens: f64,
    avg_output_tokens: f64,
    avg_total_tokens: f64,
    avg_turns: f64,
    per_run_input_tokens: f64,
    per_run_output_tokens: f64,
    per_run_cost: Option<f64>,
    actual_model_name: String,
    #[serde(rename = "pass@1")]
    pass_at_1: PassAt1,
    #[serde(flatten)]
    extra: BTreeMap<String, ExtraValue>,
}

impl TryFrom<MetricsDocument> for AggregatedMetrics {
    type Error = String;

    fn try_from(doc: MetricsDocument) -> Result<Self, Self::Error> {
        let mut entries = Vec::new();
        for (key, value) in &doc.extra {
            match value {
                ExtraValue::Number(n) => entries.push((key.as_str(), *n)),
                ExtraValue::Other(_) if parse_cross_run_key(key).is_some() => {
                    return Err(format!("{key} is not a number"));
                }
                ExtraValue::Other(_) => {}
            }
        }

        Ok(Self {
            total_tasks: doc.total_tasks,
            total_agent_execution_time: doc.total_agent_execution_time,
            total_input_tokens: doc.total_input_tokens,
            total_output_tokens: doc.total_output_tokens,
            total_tokens: doc.total_tokens,
            total_turns: doc.total_turns,
            avg_agent_execution_time: doc.avg_agent_execution_time,
            avg_input_tokens: doc.avg_input_tokens,
            avg_output_tokens: doc.avg_output_tokens,
            avg_total_tokens: doc.avg_total_tokens,
            avg_turns: doc.avg_turns,
            per_run_input_tokens: doc.per_run_input_tokens,
            per_run_output_tokens: doc.per_run_output_tokens,
            per_run_cost: doc.per_run_cost,
            actual_model_name: doc.actual_model_name,
            pass_at_1: doc.pass_at_1,
            cross_run: CrossRunPass::from_entries(entries)?,
        })
    }
}
