/// Step-based workflow execution engine
///
/// Runs a workflow's steps strictly in order against the completion backend.
/// Parallel steps fan the same input out to every assistant as one concurrent
/// batch and concatenate the answers; sequential steps chain each assistant's
/// output into the next one. All outputs together form the final response.

use crate::{
    assistant::{Assistant, Roster},
    runtime::{
        client::{ApiError, CompletionClient, Credentials, OpenAiClient},
        history::{ConversationHistory, Message},
    },
    workflow::WorkflowStep,
};
use arc_swap::{ArcSwap, ArcSwapOption};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// Why a run did not complete
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No completion backend has been configured
    #[error("system not initialized")]
    SystemNotInitialized,

    /// A step names an assistant missing from the store
    #[error("step {step}: assistant '{assistant}' not found")]
    AssistantNotFound { step: usize, assistant: String },

    /// A completion call failed
    #[error("step {step}: assistant '{assistant}' failed: {source}")]
    Api {
        step: usize,
        assistant: String,
        #[source]
        source: ApiError,
    },
}

impl EngineError {
    /// 1-based index of the failing step, if the run got that far
    pub fn step(&self) -> Option<usize> {
        match self {
            EngineError::SystemNotInitialized => None,
            EngineError::AssistantNotFound { step, .. } | EngineError::Api { step, .. } => Some(*step),
        }
    }

    /// Id of the failing assistant, if any
    pub fn assistant(&self) -> Option<&str> {
        match self {
            EngineError::SystemNotInitialized => None,
            EngineError::AssistantNotFound { assistant, .. } | EngineError::Api { assistant, .. } => {
                Some(assistant.as_str())
            }
        }
    }
}

/// Progress of the most recent run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    /// 1-based step currently executing
    RunningStep(usize),
    Done,
    Failed,
}

/// Configured completion backend
struct Backend {
    client: Arc<dyn CompletionClient>,
}

/// Executes workflows and owns the session's conversation history
pub struct ExecutionEngine {
    /// Swapped atomically on (re-)initialization; a run keeps the snapshot it started with
    backend: ArcSwapOption<Backend>,
    history: RwLock<ConversationHistory>,
    /// Serializes runs: one execution at a time
    run_lock: Mutex<()>,
    state: ArcSwap<RunState>,
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionEngine {
    /// Create an uninitialized engine with empty history
    pub fn new() -> Self {
        Self {
            backend: ArcSwapOption::empty(),
            history: RwLock::new(ConversationHistory::new()),
            run_lock: Mutex::new(()),
            state: ArcSwap::from_pointee(RunState::NotStarted),
        }
    }

    /// Install an OpenAI-compatible backend from credentials
    ///
    /// On failure the engine is left uninitialized.
    pub fn connect(&self, credentials: Credentials, timeout: Duration) -> Result<(), ApiError> {
        let api_base = credentials.api_base.clone();
        match OpenAiClient::new(credentials, timeout) {
            Ok(client) => {
                self.initialize(Arc::new(client));
                tracing::info!("🔌 Completion backend initialized: {}", api_base);
                Ok(())
            }
            Err(e) => {
                self.backend.store(None);
                tracing::error!("❌ Completion backend initialization failed: {}", e);
                Err(e)
            }
        }
    }

    /// Install any completion backend
    pub fn initialize(&self, client: Arc<dyn CompletionClient>) {
        self.backend.store(Some(Arc::new(Backend { client })));
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.load().is_some()
    }

    pub fn state(&self) -> RunState {
        **self.state.load()
    }

    /// Run `steps` on `initial_message`
    ///
    /// The user message is recorded before the first step and stays in history
    /// even if the run fails; the assistant message is recorded only on success.
    pub async fn run(
        &self,
        initial_message: &str,
        steps: &[WorkflowStep],
        roster: &Roster,
        model: &str,
    ) -> Result<String, EngineError> {
        let backend = self.backend.load_full().ok_or_else(|| {
            tracing::error!("❌ Run rejected: system not initialized");
            EngineError::SystemNotInitialized
        })?;

        let _running = self.run_lock.lock().await;
        let started = Instant::now();
        tracing::info!("🚀 Starting workflow run: {} steps (model: {})", steps.len(), model);

        self.history.write().await.push(Message::user(initial_message));

        let result = self.run_steps(backend.client.as_ref(), initial_message, steps, roster, model).await;

        match &result {
            Ok(final_response) => {
                self.history.write().await.push(Message::assistant(final_response.as_str()));
                self.state.store(Arc::new(RunState::Done));
                tracing::info!("🎉 Workflow run completed in {:?}", started.elapsed());
            }
            Err(e) => {
                self.state.store(Arc::new(RunState::Failed));
                tracing::error!("❌ Workflow run failed after {:?}: {}", started.elapsed(), e);
            }
        }

        result
    }

    async fn run_steps(
        &self,
        client: &dyn CompletionClient,
        initial_message: &str,
        steps: &[WorkflowStep],
        roster: &Roster,
        model: &str,
    ) -> Result<String, EngineError> {
        let mut current = initial_message.to_string();
        let mut results: Vec<String> = Vec::new();

        for (index, step) in steps.iter().enumerate() {
            let step_no = index + 1;
            self.state.store(Arc::new(RunState::RunningStep(step_no)));
            tracing::info!(
                "📍 Step {}/{}: {} [{}]",
                step_no,
                steps.len(),
                step.kind(),
                step.assistants.join(", ")
            );

            let personas = resolve_personas(step, step_no, roster)?;

            if step.is_parallel {
                let calls = personas
                    .iter()
                    .map(|assistant| consult(client, step_no, assistant, &current, model));
                let step_results = try_join_all(calls).await?;
                current = step_results.join("\n");
                results.extend(step_results);
            } else {
                for assistant in personas {
                    let response = consult(client, step_no, assistant, &current, model).await?;
                    results.push(response.clone());
                    current = response;
                }
            }
        }

        Ok(results.join("\n"))
    }

    /// Copy of the conversation so far
    pub async fn messages(&self) -> Vec<Message> {
        self.history.read().await.messages().to_vec()
    }

    pub async fn formatted_history(&self) -> String {
        self.history.read().await.formatted()
    }

    pub async fn clear_history(&self) {
        self.history.write().await.clear();
        tracing::info!("🧹 Conversation history cleared");
    }

    /// Dump the conversation into `dir`, returning the file path
    ///
    /// Writes from a snapshot on the blocking pool; the history stays available
    /// while the file is written.
    pub async fn export_conversation(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let history = self.history.read().await.clone();
        let dir = dir.to_path_buf();
        let count = history.len();

        let path = tokio::task::spawn_blocking(move || history.export_to_dir(&dir)).await??;
        tracing::info!("📝 Exported {} messages to {}", count, path.display());
        Ok(path)
    }
}

fn resolve_personas<'r>(step: &WorkflowStep, step_no: usize, roster: &'r Roster) -> Result<Vec<&'r Assistant>, EngineError> {
    step.assistants
        .iter()
        .map(|id| {
            roster.get(id).ok_or_else(|| EngineError::AssistantNotFound {
                step: step_no,
                assistant: id.clone(),
            })
        })
        .collect()
}

async fn consult(
    client: &dyn CompletionClient,
    step_no: usize,
    assistant: &Assistant,
    input: &str,
    model: &str,
) -> Result<String, EngineError> {
    let started = Instant::now();
    tracing::debug!("💬 Consulting '{}' ({} chars in)", assistant.id, input.len());

    let response = client
        .complete(&assistant.system_context(), input, model)
        .await
        .map_err(|source| EngineError::Api {
            step: step_no,
            assistant: assistant.id.clone(),
            source,
        })?;

    tracing::debug!("✅ '{}' answered in {:?} ({} chars)", assistant.id, started.elapsed(), response.len());
    Ok(response)
}
