/// JSON persistence layer for workflow storage
///
/// The workflow file is a single JSON object mapping workflow name to workflow
/// record. It is read once at startup and rewritten in full on every mutation.

use crate::{
    persist::{back_up, write_whole_file},
    workflow::types::Workflow,
};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Handle to the workflow file
#[derive(Debug, Clone)]
pub struct WorkflowFile {
    path: PathBuf,
}

impl WorkflowFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every saved workflow; a missing file is an empty store
    ///
    /// Entries are re-keyed by their own `name` field. Entries that fail to parse
    /// are logged and skipped, and the file is backed up before anything can
    /// rewrite it.
    pub fn load_all(&self) -> Result<BTreeMap<String, Workflow>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let stored: Map<String, Value> = serde_json::from_str(&text)
            .inspect_err(|_| self.preserve_original())
            .with_context(|| format!("failed to parse {}", self.path.display()))?;

        let mut workflows = BTreeMap::new();
        for (key, entry) in &stored {
            match serde_json::from_value::<Workflow>(entry.clone()) {
                Ok(workflow) => {
                    workflows.insert(workflow.name.clone(), workflow);
                }
                Err(e) => tracing::warn!(
                    "⚠️ Skipping workflow '{}' in {}: {}",
                    key,
                    self.path.display(),
                    e
                ),
            }
        }

        if workflows.len() < stored.len() {
            self.preserve_original();
        }
        Ok(workflows)
    }

    /// Serialize the whole map, pretty-printed
    pub fn save_all(&self, workflows: &BTreeMap<String, Workflow>) -> Result<()> {
        let json = serde_json::to_string_pretty(workflows)?;
        write_whole_file(&self.path, json.as_bytes())
    }

    /// Keep a `.bak` copy of a file that is about to lose content
    fn preserve_original(&self) {
        if let Err(e) = back_up(&self.path) {
            tracing::error!("❌ {:#}", e);
        }
    }
}
