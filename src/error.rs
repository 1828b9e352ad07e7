/// Store-level error kinds
///
/// Shared by the assistant and workflow stores. Low-level I/O faults never leave
/// a store raw: they are logged where they happen and folded into `Persistence`.

/// Failure of a store mutation or lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An assistant with the derived id already exists
    #[error("assistant id already exists: {0}")]
    DuplicateId(String),

    /// Unknown assistant id or workflow name
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    /// A step was requested with no usable assistant ids
    #[error("no assistants selected for the step")]
    EmptySelection,

    /// Blank assistant or workflow name
    #[error("name must not be empty")]
    EmptyName,

    /// Attempt to save a draft without steps
    #[error("current workflow has no steps")]
    EmptyDraft,

    /// The backing file could not be written
    #[error("failed to persist store: {0}")]
    Persistence(String),
}

impl StoreError {
    pub fn assistant_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { kind: "assistant", key: id.into() }
    }

    pub fn workflow_not_found(name: impl Into<String>) -> Self {
        Self::NotFound { kind: "workflow", key: name.into() }
    }
}
