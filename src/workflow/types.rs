/// Core workflow type definitions
///
/// A workflow is a named, ordered list of steps. Each step is either a parallel
/// fan-out (every assistant sees the same input) or a sequential chain (each
/// assistant consumes the previous one's output). These types are serialized to
/// JSON for persistence.

use crate::persist::deserialize_timestamp;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage of a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Time-derived identifier, e.g. "20250101120000123456"
    #[serde(default = "new_step_id")]
    pub step_id: String,
    /// Assistant ids in declared order; duplicates are allowed
    pub assistants: Vec<String>,
    /// Fan out to all assistants at once instead of chaining them
    pub is_parallel: bool,
}

impl WorkflowStep {
    pub fn new(assistants: Vec<String>, is_parallel: bool) -> Self {
        Self {
            step_id: new_step_id(),
            assistants,
            is_parallel,
        }
    }

    pub fn kind(&self) -> StepKind {
        if self.is_parallel {
            StepKind::Parallel
        } else {
            StepKind::Sequential
        }
    }
}

/// Fresh step id from the local clock, microsecond resolution
pub fn new_step_id() -> String {
    Local::now().format("%Y%m%d%H%M%S%6f").to_string()
}

/// How a step dispatches its assistants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Parallel,
    Sequential,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Parallel => f.write_str("parallel"),
            StepKind::Sequential => f.write_str("sequential"),
        }
    }
}

/// A saved workflow; `name` is the store key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    pub steps: Vec<WorkflowStep>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub modified_at: DateTime<Utc>,
}

impl Workflow {
    pub fn new(name: impl Into<String>, steps: Vec<WorkflowStep>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            steps,
            description: description.into(),
            created_at: now,
            modified_at: now,
        }
    }
}

/// Display row for one draft step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    /// 1-based position in the draft
    pub index: usize,
    pub kind: StepKind,
    /// Assistant names joined with " + "
    pub assistants: String,
}
