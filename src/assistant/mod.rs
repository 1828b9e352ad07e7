/// Assistant Management Layer
///
/// Personas (name, role, system prompt) and their durable store:
/// - Type definitions and the whitelisted partial update
/// - YAML config file persistence
/// - Insertion-ordered store seeded with built-in defaults

pub mod storage;
pub mod store;
pub mod types;

pub use storage::AssistantConfigFile;
pub use store::{AssistantStore, Roster};
pub use types::{default_assistants, derive_id, Assistant, AssistantUpdate};
