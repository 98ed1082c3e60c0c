//! Diagnostics collected while loading the configured datasets.
//!
//! Startup never aborts on a bad source file; each outcome is recorded here
//! and the binary decides what to log.

use std::path::Path;

use serde::Serialize;

/// What happened to one configured source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOutcome {
    /// File read and parsed; the dataset is in the registry.
    Loaded,
    /// File not present on disk; the dataset is absent.
    Missing,
    /// File present but unreadable or unparsable; the dataset is absent.
    Failed,
}

/// Outcome record for one configured source.
#[derive(Debug, Clone, Serialize)]
pub struct LoadEntry {
    pub dataset: String,
    pub path: String,
    pub outcome: LoadOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Complete diagnostics for one registry load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub entries: Vec<LoadEntry>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_loaded(&mut self, dataset: &str, path: &Path, rows: usize) {
        self.entries.push(LoadEntry {
            dataset: dataset.to_string(),
            path: path.display().to_string(),
            outcome: LoadOutcome::Loaded,
            rows: Some(rows),
            message: None,
        });
    }

    pub fn add_missing(&mut self, dataset: &str, path: &Path) {
        self.entries.push(LoadEntry {
            dataset: dataset.to_string(),
            path: path.display().to_string(),
            outcome: LoadOutcome::Missing,
            rows: None,
            message: None,
        });
    }

    pub fn add_failed(&mut self, dataset: &str, path: &Path, message: &str) {
        self.entries.push(LoadEntry {
            dataset: dataset.to_string(),
            path: path.display().to_string(),
            outcome: LoadOutcome::Failed,
            rows: None,
            message: Some(message.to_string()),
        });
    }

    /// Number of datasets that made it into the registry.
    pub fn loaded_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == LoadOutcome::Loaded)
            .count()
    }

    /// Number of configured sources that were skipped.
    pub fn skipped_count(&self) -> usize {
        self.entries.len() - self.loaded_count()
    }

    pub fn has_issues(&self) -> bool {
        self.skipped_count() > 0
    }
}
