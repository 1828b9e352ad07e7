/// Workflow store with an editable draft
///
/// Owns the saved workflows (keyed by name) and the current draft: the
/// in-progress step list a user assembles before naming and saving it. Steps move
/// between the draft and saved workflows by value, never by reference, so editing
/// one can never alter the other.

use crate::{
    assistant::AssistantStore,
    error::StoreError,
    workflow::{
        storage::WorkflowFile,
        types::{StepView, Workflow, WorkflowStep},
    },
};
use std::collections::BTreeMap;

/// Durable mapping of workflow name to steps, plus the current draft
#[derive(Debug)]
pub struct WorkflowStore {
    workflows: BTreeMap<String, Workflow>,
    draft: Vec<WorkflowStep>,
    storage: WorkflowFile,
}

impl WorkflowStore {
    /// Load saved workflows; an unreadable file is logged and treated as empty
    pub fn load(storage: WorkflowFile) -> Self {
        let workflows = match storage.load_all() {
            Ok(workflows) => {
                tracing::info!("📥 Loaded {} workflows from {}", workflows.len(), storage.path().display());
                workflows
            }
            Err(e) => {
                tracing::error!("❌ Failed to load workflows: {:#}", e);
                BTreeMap::new()
            }
        };

        Self {
            workflows,
            draft: Vec::new(),
            storage,
        }
    }

    /// Append a step to the draft
    ///
    /// Blank ids are dropped; duplicates are kept in declared order.
    pub fn add_step<I, S>(&mut self, assistant_ids: I, is_parallel: bool) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let assistants: Vec<String> = assistant_ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        if assistants.is_empty() {
            tracing::error!("❌ Failed to add workflow step: no assistants selected");
            return Err(StoreError::EmptySelection);
        }

        let mut step = WorkflowStep::new(assistants, is_parallel);
        if self.draft.iter().any(|s| s.step_id == step.step_id) {
            let base = step.step_id.clone();
            let mut suffix = 1;
            while self.draft.iter().any(|s| s.step_id == format!("{base}-{suffix}")) {
                suffix += 1;
            }
            step.step_id = format!("{base}-{suffix}");
        }

        tracing::info!("➕ Added {} step with {} assistants", step.kind(), step.assistants.len());
        self.draft.push(step);
        Ok(())
    }

    /// Snapshot the draft into a saved workflow, overwriting any with the same name
    ///
    /// An overwritten workflow keeps its original `created_at`.
    pub fn save_draft_as(&mut self, name: &str, description: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            tracing::error!("❌ Failed to save workflow: empty name");
            return Err(StoreError::EmptyName);
        }
        if self.draft.is_empty() {
            tracing::error!("❌ Failed to save workflow '{}': draft has no steps", name);
            return Err(StoreError::EmptyDraft);
        }

        let mut workflow = Workflow::new(name, self.draft.clone(), description);
        if let Some(existing) = self.workflows.get(name) {
            workflow.created_at = existing.created_at;
        }
        self.workflows.insert(name.to_string(), workflow);
        self.persist()?;

        tracing::info!("💾 Saved workflow: {} ({} steps)", name, self.draft.len());
        Ok(())
    }

    /// Replace the draft with a copy of a saved workflow's steps
    pub fn load_into_draft(&mut self, name: &str) -> Result<(), StoreError> {
        let Some(workflow) = self.workflows.get(name) else {
            tracing::error!("❌ Failed to load workflow: '{}' does not exist", name);
            return Err(StoreError::workflow_not_found(name));
        };

        self.draft = workflow.steps.clone();
        tracing::info!("📋 Loaded workflow into draft: {}", name);
        Ok(())
    }

    /// Empty the draft
    pub fn clear_draft(&mut self) {
        self.draft.clear();
        tracing::info!("🧹 Cleared current workflow draft");
    }

    /// Remove a saved workflow
    pub fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        if self.workflows.remove(name).is_none() {
            tracing::warn!("⚠️ Cannot delete workflow '{}': not found", name);
            return Err(StoreError::workflow_not_found(name));
        }

        self.persist()?;
        tracing::info!("🗑️ Deleted workflow: {}", name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Workflow> {
        self.workflows.get(name)
    }

    /// Saved workflow names, sorted
    pub fn names(&self) -> Vec<String> {
        self.workflows.keys().cloned().collect()
    }

    pub fn list(&self) -> Vec<&Workflow> {
        self.workflows.values().collect()
    }

    pub fn draft(&self) -> &[WorkflowStep] {
        &self.draft
    }

    /// Display rows for the draft
    ///
    /// Ids that no longer resolve to an assistant are shown as-is.
    pub fn render(&self, assistants: &AssistantStore) -> Vec<StepView> {
        self.draft
            .iter()
            .enumerate()
            .map(|(i, step)| StepView {
                index: i + 1,
                kind: step.kind(),
                assistants: step
                    .assistants
                    .iter()
                    .map(|id| assistants.get(id).map_or(id.as_str(), |a| a.name.as_str()))
                    .collect::<Vec<_>>()
                    .join(" + "),
            })
            .collect()
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.storage.save_all(&self.workflows).map_err(|e| {
            tracing::error!("❌ Failed to save workflows to {}: {:#}", self.storage.path().display(), e);
            StoreError::Persistence(e.to_string())
        })?;
        tracing::debug!("💾 Saved {} workflows", self.workflows.len());
        Ok(())
    }
}
