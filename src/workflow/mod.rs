/// Workflow Management Layer
///
/// This module handles workflow definitions, persistence, and the editable draft.
/// It provides:
/// - Type definitions (Workflow, WorkflowStep, StepKind)
/// - JSON file persistence
/// - The workflow store that owns saved workflows and the current draft

// Core workflow type definitions
pub mod types;

// Whole-file JSON persistence
pub mod storage;

// Saved workflows plus the in-progress draft
pub mod store;

// Re-export commonly used types
pub use storage::WorkflowFile;
pub use store::WorkflowStore;
pub use types::{StepKind, StepView, Workflow, WorkflowStep};
