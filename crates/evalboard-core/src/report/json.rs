//! JSON report generation

use crate::error::EvalboardResult;

use super::Report;

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Generate a JSON report
    pub fn generate(report: &Report) -> EvalboardResult<String> {
        let json = serde_json::to_string_pretty(report)?;
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;

    #[test]
    fn test_json_document_shape() {
        let json = JsonReporter::generate(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["generated_at"].is_string());
        assert_eq!(value["k"], 2);

        let fast = &value["leaderboard"]["github"]["impl-fast"];
        assert_eq!(fast["pass@1"]["avg"], 0.75);
        assert_eq!(fast["pass@2"], 0.9);
        assert_eq!(fast["pass^2"], 0.6);
        assert_eq!(fast["actual_model_name"], "gpt-4o");

        let slow = &value["leaderboard"]["github"]["impl-slow"];
        assert!(slow.get("pass@2").is_none());
        assert!(slow.get("pass^2").is_none());
    }
}
