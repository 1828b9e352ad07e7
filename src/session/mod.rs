/// Chat session facade
///
/// The operations a presentation layer calls: initialize the backend, read the
/// assistant and workflow lists, submit a message through a named workflow, and
/// export or clear the conversation. Owns both stores, the execution engine and
/// the visible transcript for a single session.

pub mod transcript;

use crate::{
    assistant::{Assistant, AssistantConfigFile, AssistantStore},
    config::{CompletionConfig, Config},
    runtime::{ApiError, CompletionClient, Credentials, ExecutionEngine},
    workflow::{WorkflowFile, WorkflowStore},
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub use transcript::{Exchange, Transcript};

/// Result of a submission: the updated transcript, its log, and the failure text if any
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReply {
    pub history: Vec<Exchange>,
    pub log: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct ChatSession {
    assistants: RwLock<AssistantStore>,
    workflows: RwLock<WorkflowStore>,
    engine: ExecutionEngine,
    transcript: RwLock<Transcript>,
    settings: CompletionConfig,
    conversation_dir: PathBuf,
}

impl ChatSession {
    pub fn new(
        assistants: AssistantStore,
        workflows: WorkflowStore,
        settings: CompletionConfig,
        conversation_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            assistants: RwLock::new(assistants),
            workflows: RwLock::new(workflows),
            engine: ExecutionEngine::new(),
            transcript: RwLock::new(Transcript::default()),
            settings,
            conversation_dir: conversation_dir.into(),
        }
    }

    /// Load both stores from the configured data directory
    ///
    /// `api_settings` in the assistant config file are merged into the completion
    /// defaults; a malformed section is logged and ignored.
    pub fn open(config: &Config) -> Self {
        let assistant_file = AssistantConfigFile::new(config.storage.assistant_config_path());
        let mut settings = config.completion.clone();
        match assistant_file.load_api_settings() {
            Ok(Some(file_settings)) => settings.merge_file_settings(file_settings),
            Ok(None) => {}
            Err(e) => tracing::warn!("⚠️ Ignoring api_settings: {:#}", e),
        }

        let assistants = AssistantStore::load(assistant_file);
        let workflows = WorkflowStore::load(WorkflowFile::new(config.storage.workflow_file_path()));

        Self::new(assistants, workflows, settings, config.storage.conversation_dir())
    }

    pub fn assistants(&self) -> &RwLock<AssistantStore> {
        &self.assistants
    }

    pub fn workflows(&self) -> &RwLock<WorkflowStore> {
        &self.workflows
    }

    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    pub fn settings(&self) -> &CompletionConfig {
        &self.settings
    }

    /// Configure the completion backend
    ///
    /// `api_base` falls back to the configured default when absent or blank.
    pub fn initialize(&self, api_key: &str, api_base: Option<&str>) -> Result<(), ApiError> {
        let api_base = api_base
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(self.settings.api_base.as_str())
            .to_string();

        self.engine.connect(
            Credentials {
                api_key: api_key.trim().to_string(),
                api_base,
            },
            Duration::from_secs(self.settings.timeout_secs),
        )
    }

    /// Configure a custom completion backend
    pub fn initialize_with(&self, client: Arc<dyn CompletionClient>) {
        self.engine.initialize(client);
        tracing::info!("🔌 Completion backend installed");
    }

    pub async fn list_assistants(&self) -> Vec<Assistant> {
        self.assistants.read().await.list().to_vec()
    }

    pub async fn assistant_choices(&self) -> Vec<String> {
        self.assistants.read().await.choices()
    }

    pub async fn list_workflows(&self) -> Vec<String> {
        self.workflows.read().await.names()
    }

    pub fn models(&self) -> &[String] {
        &self.settings.models
    }

    /// Run `message` through the named workflow
    ///
    /// An empty message changes nothing. Every other outcome, success or failure,
    /// is recorded as an exchange in the transcript.
    pub async fn submit(&self, message: &str, workflow_name: Option<&str>, model: Option<&str>) -> SubmitReply {
        if message.trim().is_empty() {
            return self.reply(None).await;
        }

        if !self.engine.is_initialized() {
            return self.fail(message, "system not initialized, call initialize first").await;
        }

        let Some(name) = workflow_name.map(str::trim).filter(|n| !n.is_empty()) else {
            return self.fail(message, "no workflow selected").await;
        };

        let steps = self.workflows.read().await.get(name).map(|w| w.steps.clone());
        let Some(steps) = steps else {
            return self.fail(message, &format!("workflow not found: {}", name)).await;
        };
        let roster = self.assistants.read().await.roster();
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.settings.default_model.as_str());

        tracing::info!("📨 Submitting message through workflow '{}'", name);

        match self.engine.run(message, &steps, &roster, model).await {
            Ok(response) => {
                self.transcript.write().await.push(message, response);
                self.reply(None).await
            }
            Err(e) => self.fail(message, &e.to_string()).await,
        }
    }

    async fn fail(&self, message: &str, cause: &str) -> SubmitReply {
        tracing::error!("❌ Message processing failed: {}", cause);
        self.transcript.write().await.push(message, format!("Error: {}", cause));
        self.reply(Some(cause.to_string())).await
    }

    async fn reply(&self, error: Option<String>) -> SubmitReply {
        let transcript = self.transcript.read().await;
        SubmitReply {
            history: transcript.exchanges().to_vec(),
            log: transcript.log(),
            error,
        }
    }

    pub async fn formatted_history(&self) -> String {
        self.engine.formatted_history().await
    }

    /// Write the conversation history to a timestamped file
    pub async fn export_conversation(&self) -> anyhow::Result<PathBuf> {
        self.engine.export_conversation(&self.conversation_dir).await
    }

    /// Clear the visible transcript and the conversation history
    pub async fn clear_conversation(&self) {
        self.transcript.write().await.clear();
        self.engine.clear_history().await;
    }
}
