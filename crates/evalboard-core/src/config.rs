//! Evalboard configuration
//!
//! Configuration options for building a leaderboard. Values come from an
//! optional TOML or JSON file; the CLI overrides them field by field.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EvalboardError, EvalboardResult};
use crate::pricing::{PricingResolver, PricingTable};

/// Configuration for a leaderboard build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalboardConfig {
    /// Root of the `group/implementation/run-N` tree
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Requested number of runs per implementation
    #[serde(default = "default_k")]
    pub k: usize,

    /// Where the JSON leaderboard is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// File name of the run-level summary inside each run directory
    #[serde(default = "default_summary_file")]
    pub summary_file: String,

    /// File name of the per-task metadata inside each task directory
    #[serde(default = "default_task_meta_file")]
    pub task_meta_file: String,

    /// Run directory prefix; run `n` lives in `<prefix><n>`
    #[serde(default = "default_run_dir_prefix")]
    pub run_dir_prefix: String,

    /// Server groups to include (empty = all)
    #[serde(default)]
    pub server_groups: Vec<String>,

    /// Extra pricing file (TOML or JSON)
    pub pricing_file: Option<PathBuf>,

    /// Inline pricing overrides
    #[serde(default = "PricingTable::empty")]
    pub pricing: PricingTable,

    /// Use only the configured pricing instead of extending the builtin table
    #[serde(default)]
    pub replace_default_pricing: bool,
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_k() -> usize {
    4
}

fn default_output() -> PathBuf {
    PathBuf::from("leaderboard.json")
}

fn default_summary_file() -> String {
    "summary.json".to_string()
}

fn default_task_meta_file() -> String {
    "meta.json".to_string()
}

fn default_run_dir_prefix() -> String {
    "run-".to_string()
}

impl Default for EvalboardConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            k: default_k(),
            output: default_output(),
            summary_file: default_summary_file(),
            task_meta_file: default_task_meta_file(),
            run_dir_prefix: default_run_dir_prefix(),
            server_groups: Vec::new(),
            pricing_file: None,
            pricing: PricingTable::empty(),
            replace_default_pricing: false,
        }
    }
}

impl EvalboardConfig {
    /// Load configuration from a TOML or JSON file (chosen by extension)
    pub fn from_file(path: impl AsRef<Path>) -> EvalboardResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| EvalboardError::io(path, e))?;

        let config: EvalboardConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| EvalboardError::parse(path, e))?
        } else {
            toml::from_str(&content).map_err(|e| EvalboardError::parse(path, e))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Set the results directory
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Set the requested run count
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the output path
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Set the pricing file
    pub fn with_pricing_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.pricing_file = Some(path.into());
        self
    }

    /// Restrict to the given server groups
    pub fn with_server_groups(mut self, groups: Vec<String>) -> Self {
        self.server_groups = groups;
        self
    }

    /// Replace the builtin pricing instead of extending it
    pub fn replacing_default_pricing(mut self) -> Self {
        self.replace_default_pricing = true;
        self
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> EvalboardResult<()> {
        if self.k == 0 {
            return Err(EvalboardError::invalid_config("k must be at least 1"));
        }
        if self.run_dir_prefix.is_empty() {
            return Err(EvalboardError::invalid_config(
                "run_dir_prefix must not be empty",
            ));
        }
        self.pricing.validate()
    }

    /// Build the effective pricing table: builtin (unless replaced), then the
    /// pricing file, then inline overrides
    pub fn pricing_table(&self) -> EvalboardResult<PricingTable> {
        let mut table = if self.replace_default_pricing {
            PricingTable::empty()
        } else {
            PricingTable::builtin()
        };

        if let Some(path) = &self.pricing_file {
            table.extend(PricingTable::from_file(path)?);
        }
        table.extend(self.pricing.clone());
        table.validate()?;

        Ok(table)
    }

    /// A resolver over [`Self::pricing_table`]
    pub fn pricing_resolver(&self) -> EvalboardResult<PricingResolver> {
        Ok(PricingResolver::new(self.pricing_table()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::ModelPricing;

    #[test]
    fn test_default_config() {
        let config = EvalboardConfig::default();
        assert_eq!(config.k, 4);
        assert_eq!(config.summary_file, "summary.json");
        assert_eq!(config.task_meta_file, "meta.json");
        assert_eq!(config.run_dir_prefix, "run-");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = EvalboardConfig::default()
            .with_results_dir("/data/results")
            .with_k(3)
            .with_output("out/board.json")
            .with_server_groups(vec!["github".to_string()]);

        assert_eq!(config.results_dir, PathBuf::from("/data/results"));
        assert_eq!(config.k, 3);
        assert_eq!(config.output, PathBuf::from("out/board.json"));
        assert_eq!(config.server_groups, vec!["github"]);
    }

    #[test]
    fn test_zero_k_rejected() {
        let config = EvalboardConfig::default().with_k(0);
        assert!(matches!(
            config.validate(),
            Err(EvalboardError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_toml_file_with_inline_pricing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evalboard.toml");
        std::fs::write(
            &path,
            r#"
results_dir = "runs"
k = 2

[pricing.house-model]
input = 0.001
output = 0.002
"#,
        )
        .unwrap();

        let config = EvalboardConfig::from_file(&path).unwrap();
        assert_eq!(config.results_dir, PathBuf::from("runs"));
        assert_eq!(config.k, 2);
        assert_eq!(config.output, PathBuf::from("leaderboard.json"));

        let table = config.pricing_table().unwrap();
        assert_eq!(
            table.get("house-model"),
            Some(&ModelPricing::new(0.001, 0.002))
        );
        assert!(table.get("gpt-4o").is_some());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evalboard.json");
        std::fs::write(&path, r#"{"k": 5, "run_dir_prefix": "attempt_"}"#).unwrap();

        let config = EvalboardConfig::from_file(&path).unwrap();
        assert_eq!(config.k, 5);
        assert_eq!(config.run_dir_prefix, "attempt_");
    }

    #[test]
    fn test_replace_default_pricing() {
        let mut config = EvalboardConfig::default().replacing_default_pricing();
        config.pricing = PricingTable::empty().with_model("only", ModelPricing::new(1.0, 1.0));

        let table = config.pricing_table().unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("gpt-4o").is_none());
    }

    #[test]
    fn test_pricing_file_layered_under_inline() {
        let dir = tempfile::tempdir().unwrap();
        let pricing_path = dir.path().join("pricing.json");
        std::fs::write(
            &pricing_path,
            r#"{"shared": {"input": 1.0, "output": 1.0}, "file-only": {"input": 2.0, "output": 2.0}}"#,
        )
        .unwrap();

        let mut config = EvalboardConfig::default().with_pricing_file(&pricing_path);
        config.pricing = PricingTable::empty().with_model("shared", ModelPricing::new(9.0, 9.0));

        let table = config.pricing_table().unwrap();
        assert_eq!(table.get("shared"), Some(&ModelPricing::new(9.0, 9.0)));
        assert_eq!(table.get("file-only"), Some(&ModelPricing::new(2.0, 2.0)));
    }

    #[test]
    fn test_missing_pricing_file_is_error() {
        let config = EvalboardConfig::default().with_pricing_file("/nonexistent/pricing.toml");
        assert!(matches!(
            config.pricing_table(),
            Err(EvalboardError::Io { .. })
        ));
    }
}
