//! Terminal table report generation

use crate::metrics::AggregatedMetrics;
use crate::metrics::stats::as_percentage;
use crate::pricing::format_cost;

use super::Report;

/// Cross-run columns for one entry, `-` when absent
fn cross_run_cells(metrics: &AggregatedMetrics) -> (String, String) {
    match &metrics.cross_run {
        Some(cross) => (
            format!("{}={}", cross.pass_at_k_key(), as_percentage(cross.pass_at_k)),
            format!("{}={}", cross.pass_power_k_key(), as_percentage(cross.pass_power_k)),
        ),
        None => ("-".to_string(), "-".to_string()),
    }
}

fn cost_cell(metrics: &AggregatedMetrics) -> String {
    metrics
        .per_run_cost
        .map(format_cost)
        .unwrap_or_else(|| "n/a".to_string())
}

/// Fixed-width table generator for terminal output
pub struct TableReporter;

impl TableReporter {
    /// Generate a table report, one section per server group
    pub fn generate(report: &Report) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{:=<100}\n", "= Evalboard Leaderboard "));
        output.push_str(&format!(
            "Generated: {} | Requested runs: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.k
        ));
        output.push_str(&format!("{:=<100}\n", ""));

        if report.is_empty() {
            output.push_str("\nNo implementations with valid runs.\n");
            return output;
        }

        for group in report.leaderboard.keys() {
            output.push_str(&format!("\n{}\n", group.to_uppercase()));
            output.push_str(&format!("{:-<100}\n", ""));
            output.push_str(&format!(
                "{:<24} {:>8} {:>7} {:>12} {:>12} {:>7} {:>11} {:>10}\n",
                "Implementation", "Pass@1", "Std", "Pass@k", "Pass^k", "Tasks", "Avg Turns", "Cost/Run"
            ));
            output.push_str(&format!("{:-<100}\n", ""));

            for (name, metrics) in report.ranked(group) {
                let name = if name.chars().count() > 22 {
                    format!("{}...", name.chars().take(19).collect::<String>())
                } else {
                    name.to_string()
                };
                let (at_k, power_k) = cross_run_cells(metrics);

                output.push_str(&format!(
                    "{:<24} {:>8} {:>7.4} {:>12} {:>12} {:>7} {:>11.2} {:>10}\n",
                    name,
                    as_percentage(metrics.pass_at_1.avg),
                    metrics.pass_at_1.std,
                    at_k,
                    power_k,
                    metrics.total_tasks,
                    metrics.avg_turns,
                    cost_cell(metrics)
                ));
            }
        }

        output.push_str(&format!("{:=<100}\n", ""));
        output
    }

}
