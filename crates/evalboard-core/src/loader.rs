//! Run artifact loading
//!
//! Discovers `<results>/<group>/<implementation>/<run-N>` directories and reads
//! their summaries and task metadata. Every per-run and per-task failure is
//! downgraded to a warning plus a default value; only an unreadable results
//! root is an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::EvalboardConfig;
use crate::error::{EvalboardError, EvalboardResult};
use crate::metrics::{RunArtifacts, RunSummary, TaskResult};

/// All run slots of one implementation
#[derive(Debug, Clone, PartialEq)]
pub struct ImplementationRuns {
    /// Server group directory name
    pub server_group: String,

    /// Implementation directory name
    pub implementation: String,

    /// Run slots 1..=k; `runs[0]` is run 1
    pub runs: Vec<RunArtifacts>,
}

impl ImplementationRuns {
    pub fn new(
        server_group: impl Into<String>,
        implementation: impl Into<String>,
        runs: Vec<RunArtifacts>,
    ) -> Self {
        Self {
            server_group: server_group.into(),
            implementation: implementation.into(),
            runs,
        }
    }
}

/// Loader for benchmark run artifacts
pub struct ArtifactLoader {
    results_dir: PathBuf,
    k: usize,
    run_dir_prefix: String,
    summary_file: String,
    task_meta_file: String,
    server_groups: Vec<String>,
}

impl ArtifactLoader {
    /// Create a loader from configuration
    pub fn new(config: &EvalboardConfig) -> Self {
        Self {
            results_dir: config.results_dir.clone(),
            k: config.k,
            run_dir_prefix: config.run_dir_prefix.clone(),
            summary_file: config.summary_file.clone(),
            task_meta_file: config.task_meta_file.clone(),
            server_groups: config.server_groups.clone(),
        }
    }

    /// Restrict discovery to the given server groups
    pub fn with_server_groups(mut self, groups: Vec<String>) -> Self {
        self.server_groups = groups;
        self
    }

    /// Discover every implementation under the results root, sorted by group
    /// then implementation name
    pub fn discover(&self) -> EvalboardResult<Vec<ImplementationRuns>> {
        let groups = list_subdirs(&self.results_dir)
            .map_err(|e| EvalboardError::io(&self.results_dir, e))?;

        let mut implementations = Vec::new();

        for (group, group_path) in groups {
            if !self.server_groups.is_empty() && !self.server_groups.contains(&group) {
                debug!("Skipping server group {} (filtered)", group);
                continue;
            }

            let entries = match list_subdirs(&group_path) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Failed to list server group {:?}: {}", group_path, e);
                    continue;
                }
            };

            for (implementation, impl_path) in entries {
                debug!("Loading {}/{}", group, implementation);
                let runs = self.load_runs(&impl_path);
                implementations.push(ImplementationRuns::new(&group, implementation, runs));
            }
        }

        Ok(implementations)
    }

    /// Load run slots 1..=k of one implementation directory
    pub fn load_runs(&self, impl_dir: &Path) -> Vec<RunArtifacts> {
        (1..=self.k)
            .map(|index| {
                let run_dir = impl_dir.join(format!("{}{}", self.run_dir_prefix, index));
                self.load_run(&run_dir)
            })
            .collect()
    }

    /// Load one run directory. A missing directory is an empty slot; a present
    /// one always yields a summary and a task map, defaulted where unreadable.
    pub fn load_run(&self, run_dir: &Path) -> RunArtifacts {
        if !run_dir.is_dir() {
            return RunArtifacts::missing();
        }

        RunArtifacts {
            summary: Some(self.load_summary(run_dir)),
            tasks: Some(self.load_tasks(run_dir)),
        }
    }

    fn load_summary(&self, run_dir: &Path) -> RunSummary {
        let path = run_dir.join(&self.summary_file);
        if !path.is_file() {
            warn!("Missing run summary {:?}; using zero values", path);
            return RunSummary::default();
        }

        read_json(&path).unwrap_or_else(|e| {
            warn!("Failed to load run summary: {}; using zero values", e);
            RunSummary::default()
        })
    }

    /// Collect every task metadata file below `run_dir`, keyed by the task
    /// directory's path relative to the run
    fn load_tasks(&self, run_dir: &Path) -> BTreeMap<String, TaskResult> {
        let mut tasks = BTreeMap::new();

        for entry in WalkDir::new(run_dir)
            .follow_links(true)
            .min_depth(2)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to walk {:?}: {}", run_dir, e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || entry.file_name() != self.task_meta_file.as_str() {
                continue;
            }

            let path = entry.path();
            let Some(task_id) = path.parent().and_then(|dir| task_id(run_dir, dir)) else {
                continue;
            };

            match read_json::<TaskResult>(path) {
                Ok(result) => {
                    tasks.insert(task_id, result);
                }
                Err(e) => warn!("Skipping task {}: {}", task_id, e),
            }
        }

        tasks
    }
}

/// `/`-joined path of `task_dir` relative to `run_dir`
fn task_id(run_dir: &Path, task_dir: &Path) -> Option<String> {
    let relative = task_dir.strip_prefix(run_dir).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Visible subdirectories of `dir`, sorted by name
fn list_subdirs(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !path.is_dir() {
            continue;
        }
        entries.push((name, path));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> EvalboardResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| EvalboardError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| EvalboardError::parse(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn loader(root: &Path, k: usize) -> ArtifactLoader {
        ArtifactLoader::new(&EvalboardConfig::default().with_results_dir(root).with_k(k))
    }

    #[test]
    fn test_task_id_is_relative_path() {
        let run = Path::new("/r/g/i/run-1");
        assert_eq!(
            task_id(run, Path::new("/r/g/i/run-1/category/task_a")),
            Some("category/task_a".to_string())
        );
        assert_eq!(task_id(run, run), None);
    }

    #[test]
    fn test_missing_run_dir_is_missing_slot() {
        let dir = tempfile::tempdir().unwrap();
        let run = loader(dir.path(), 1).load_run(&dir.path().join("run-1"));
        assert!(!run.is_present());
    }

    #[test]
    fn test_empty_run_dir_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let run_dir = dir.path().join("run-1");
        fs::create_dir_all(&run_dir).unwrap();

        let run = loader(dir.path(), 1).load_run(&run_dir);
        assert!(run.is_present());
        assert_eq!(run.summary, Some(RunSummary::default()));
        assert_eq!(run.task_count(), 0);
    }

    #[test]
    fn test_malformed_summary_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let run_dir = dir.path().join("run-1");
        write(&run_dir.join("summary.json"), "{ not json");

        let run = loader(dir.path(), 1).load_run(&run_dir);
        assert_eq!(run.summary, Some(RunSummary::default()));
    }

    #[test]
    fn test_tasks_loaded_and_malformed_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let run_dir = dir.path().join("run-1");
        write(
            &run_dir.join("easy/task_a/meta.json"),
            r#"{"execution_result": {"success": true}}"#,
        );
        write(
            &run_dir.join("easy/task_b/meta.json"),
            r#"{"execution_result": {"success": false}}"#,
        );
        write(&run_dir.join("task_c/meta.json"), "[broken");
        write(&run_dir.join("task_d/other.json"), "{}");

        let run = loader(dir.path(), 1).load_run(&run_dir);
        let tasks = run.tasks.as_ref().unwrap();

        assert_eq!(tasks.len(), 2);
        assert!(tasks["easy/task_a"].passed());
        assert!(!tasks["easy/task_b"].passed());
        assert!(!tasks.contains_key("task_c"));
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("notion/impl-b/run-1/summary.json"), "{}");
        write(&root.join("notion/impl-a/run-2/summary.json"), "{}");
        write(&root.join("github/impl-x/run-1/summary.json"), "{}");
        fs::create_dir_all(root.join(".cache/ignored")).unwrap();
        write(&root.join("README.md"), "not a group");

        let found = loader(root, 2).discover().unwrap();
        let names: Vec<(String, String)> = found
            .iter()
            .map(|i| (i.server_group.clone(), i.implementation.clone()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("github".to_string(), "impl-x".to_string()),
                ("notion".to_string(), "impl-a".to_string()),
                ("notion".to_string(), "impl-b".to_string()),
            ]
        );
        assert_eq!(found[1].runs.len(), 2);
        assert!(!found[1].runs[0].is_present());
        assert!(found[1].runs[1].is_present());

        let filtered = loader(root, 2)
            .with_server_groups(vec!["notion".to_string()])
            .discover()
            .unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_custom_run_dir_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("g/impl/attempt_2/summary.json"), "{}");
        write(&root.join("g/impl/run-1/summary.json"), "{}");

        let mut config = EvalboardConfig::default().with_results_dir(root).with_k(2);
        config.run_dir_prefix = "attempt_".to_string();

        let found = ArtifactLoader::new(&config).discover().unwrap();
        assert_eq!(found.len(), 1);
        assert!(!found[0].runs[0].is_present());
        assert!(found[0].runs[1].is_present());
    }

    #[test]
    fn test_missing_results_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = loader(&dir.path().join("absent"), 1).discover();
        assert!(matches!(result, Err(EvalboardError::Io { .. })));
    }
}
