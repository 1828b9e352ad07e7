/// Runtime Execution Engine
///
/// This module drives workflows against the chat-completion backend.
/// It handles:
/// - The completion client seam and its OpenAI-compatible implementation
/// - Step execution: concurrent fan-out for parallel steps, chaining for sequential ones
/// - The append-only conversation history and its export

// Completion backend adapter
pub mod client;

// Step execution engine
pub mod engine;

// Conversation log
pub mod history;

// Re-export main types
pub use client::{ApiError, CompletionClient, Credentials, OpenAiClient};
pub use engine::{EngineError, ExecutionEngine, RunState};
pub use history::{ConversationHistory, Message, Role};
