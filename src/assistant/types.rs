/// Assistant persona definitions
///
/// An assistant is a named persona: a role label plus the system prompt that shapes
/// how the completion backend answers. The id is derived from the name once, at
/// creation, and never changes afterwards.

use crate::persist::deserialize_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named persona that maps an input message to an output message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assistant {
    /// Store key, e.g. "code_expert"
    pub id: String,
    /// Display name, e.g. "Code Expert"
    pub name: String,
    /// Short role label shown next to the name
    pub role: String,
    /// System prompt sent with every completion request
    pub prompt: String,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub modified_at: DateTime<Utc>,
}

impl Assistant {
    /// Create an assistant whose id is derived from `name`
    pub fn new(name: impl Into<String>, role: impl Into<String>, prompt: impl Into<String>) -> Self {
        let name = name.into();
        Self::with_id(derive_id(&name), name, role, prompt)
    }

    /// Create an assistant under an explicit id (built-ins)
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            prompt: prompt.into(),
            created_at: now,
            modified_at: now,
        }
    }

    /// System context for a completion call made on behalf of this assistant
    pub fn system_context(&self) -> String {
        format!("You are {}, acting as {}.\n\n{}", self.name, self.role, self.prompt)
    }

    /// Label used by choice widgets: "Name (Role)"
    pub fn choice_label(&self) -> String {
        format!("{} ({})", self.name, self.role)
    }
}

/// Derive an assistant id from its display name
///
/// Lower-cases the name and replaces spaces with underscores.
pub fn derive_id(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Partial update of an assistant
///
/// Only these three fields are settable; anything else in an incoming payload is
/// rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl AssistantUpdate {
    /// Apply the present fields and refresh `modified_at`
    ///
    /// The id is left untouched even when the name changes.
    pub fn apply_to(self, assistant: &mut Assistant) {
        if let Some(name) = self.name {
            assistant.name = name;
        }
        if let Some(role) = self.role {
            assistant.role = role;
        }
        if let Some(prompt) = self.prompt {
            assistant.prompt = prompt;
        }
        assistant.modified_at = Utc::now();
    }
}

/// Built-in assistants seeded at every startup
///
/// File entries with the same id replace these, but all three are always present.
pub fn default_assistants() -> Vec<Assistant> {
    vec![
        Assistant::with_id(
            "code_expert",
            "Code Expert",
            "Python Developer",
            "You are a professional Python developer who follows software engineering best practices.\n\
             Responsibilities:\n\
             1. Write high-quality, maintainable code\n\
             2. Provide detailed explanations and documentation\n\
             3. Optimize performance and structure\n\
             4. Solve hard technical problems and debug\n\
             \n\
             Answer requirements:\n\
             1. Give complete, runnable code\n\
             2. Include the necessary comments\n\
             3. State the strengths and weaknesses of the code\n\
             4. Suggest possible optimizations",
        ),
        Assistant::with_id(
            "reviewer",
            "Code Reviewer",
            "Review Expert",
            "You are an experienced code reviewer focused on code quality and best practices.\n\
             Responsibilities:\n\
             1. Review code quality and style\n\
             2. Look for latent bugs and security issues\n\
             3. Propose improvements\n\
             4. Make sure the code follows best practices\n\
             \n\
             Focus areas:\n\
             1. Readability and maintainability\n\
             2. Room for performance optimization\n\
             3. Security vulnerabilities\n\
             4. Soundness of the architecture",
        ),
        Assistant::with_id(
            "architect",
            "System Architect",
            "Architecture Expert",
            "You are a senior system architect who designs scalable systems.\n\
             Responsibilities:\n\
             1. System architecture design\n\
             2. Technology selection advice\n\
             3. Performance and scalability planning\n\
             4. Evaluation of candidate solutions\n\
             \n\
             Output requirements:\n\
             1. A clear architecture outline with explanation\n\
             2. Detailed reasons for each technology choice\n\
             3. Risks and how to mitigate them\n\
             4. Scalability and maintainability considerations",
        ),
    ]
}
