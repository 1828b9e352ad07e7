/// Chorus: multi-assistant workflow engine
///
/// This library routes a user message through a saved workflow of assistant
/// personas. Steps run in order; a parallel step consults its assistants
/// concurrently, a sequential step chains them. Assistants and workflows are
/// persisted as plain files in the data directory.

// Core configuration and setup
pub mod config;

// Error types shared by the stores
pub mod error;

// Atomic whole-file writes
pub mod persist;

// Assistant personas - definitions, config file and store
pub mod assistant;

// Workflow management layer - step definitions, draft and saved workflows
pub mod workflow;

// Runtime execution engine - completion client, step execution and history
pub mod runtime;

// Chat session facade used by the presentation layer
pub mod session;

// HTTP API layer - REST endpoints over the chat session
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use assistant::{Assistant, AssistantStore};
pub use error::StoreError;
pub use runtime::{CompletionClient, EngineError, ExecutionEngine};
pub use server::start_server;
pub use session::ChatSession;
pub use workflow::{Workflow, WorkflowStep, WorkflowStore};
