//! Markdown report generation

use crate::metrics::stats::as_percentage;
use crate::pricing::format_cost;

use super::Report;

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Generate a Markdown report, one table per server group
    pub fn generate(report: &Report) -> String {
        let mut md = String::new();

        md.push_str("# Evalboard Leaderboard\n\n");
        md.push_str(&format!(
            "- **Generated**: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        md.push_str(&format!("- **Requested runs (k)**: {}\n", report.k));
        md.push_str(&format!(
            "- **Implementations**: {}\n\n",
            report.implementation_count()
        ));

        if report.is_empty() {
            md.push_str("_No implementations with valid runs._\n");
            return md;
        }

        for group in report.leaderboard.keys() {
            md.push_str(&format!("## {}\n\n", group));
            md.push_str(
                "| Implementation | Model | Pass@1 | Std | Pass@k | Pass^k | Tasks/Run | Avg Turns | Avg Tokens | Cost/Run |\n",
            );
            md.push_str(
                "|----------------|-------|--------|-----|--------|--------|-----------|-----------|------------|----------|\n",
            );

            for (name, metrics) in report.ranked(group) {
                let (at_k, power_k) = match &metrics.cross_run {
                    Some(cross) => (
                        format!("{} ({})", as_percentage(cross.pass_at_k), cross.pass_at_k_key()),
                        format!(
                            "{} ({})",
                            as_percentage(cross.pass_power_k),
                            cross.pass_power_k_key()
                        ),
                    ),
                    None => ("-".to_string(), "-".to_string()),
                };
                let model = if metrics.actual_model_name.is_empty() {
                    "-"
                } else {
                    metrics.actual_model_name.as_str()
                };

                md.push_str(&format!(
                    "| {} | {} | {} | {:.4} | {} | {} | {} | {:.2} | {:.0} | {} |\n",
                    name,
                    model,
                    as_percentage(metrics.pass_at_1.avg),
                    metrics.pass_at_1.std,
                    at_k,
                    power_k,
                    metrics.total_tasks,
                    metrics.avg_turns,
                    metrics.avg_total_tokens,
                    metrics
                        .per_run_cost
                        .map(format_cost)
                        .unwrap_or_else(|| "n/a".to_string()),
                ));
            }
            md.push('\n');
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;

    #[test]
    fn test_markdown_generation() {
        let md = MarkdownReporter::generate(&sample_report());

        assert!(md.contains("# Evalboard Leaderboard"));
        assert!(md.contains("## github"));
        assert!(md.contains("## notion"));
        assert!(md.contains("90.0% (pass@2)"));
        assert!(md.contains("| impl-slow | gpt-4o | 40.0% |"));
    }

    #[test]
    fn test_markdown_empty_report() {
        let md = MarkdownReporter::generate(&Report::new(1));
        assert!(md.contains("_No implementations with valid runs._"));
    }
}
