/// Configuration management for the Chorus engine
///
/// Handles server binding, on-disk locations of the two stores, and the defaults
/// used when talking to the chat-completion backend.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default OpenAI-compatible endpoint
pub const DEFAULT_API_BASE: &str = "https://open.api.gu28.top/v1";

/// Models offered to the presentation layer
pub const DEFAULT_MODELS: [&str; 2] = ["gpt-3.5-turbo", "gpt-4"];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// File locations
    pub storage: StorageConfig,
    /// Completion backend defaults
    pub completion: CompletionConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Locations of persisted state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory holding config.yaml, workflows.json and conversations/
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// YAML file holding the assistant list and other settings
    pub fn assistant_config_path(&self) -> PathBuf {
        self.data_dir.join("config.yaml")
    }

    /// JSON file holding saved workflows
    pub fn workflow_file_path(&self) -> PathBuf {
        self.data_dir.join("workflows.json")
    }

    /// Directory receiving exported conversations
    pub fn conversation_dir(&self) -> PathBuf {
        self.data_dir.join("conversations")
    }
}

/// Completion backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-compatible API
    pub api_base: String,
    /// API key used to initialize the session at startup, if any
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model used when a caller does not name one
    pub default_model: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Model choices offered to callers
    pub models: Vec<String>,
}

/// The `api_settings` section of config.yaml
///
/// Every field is optional; present values replace compiled defaults but never
/// values that came from the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl CompletionConfig {
    /// Overlay file settings on top of compiled defaults
    pub fn merge_file_settings(&mut self, settings: ApiSettings) {
        if std::env::var("CHORUS_API_BASE").is_err() {
            if let Some(api_base) = settings.api_base {
                self.api_base = api_base;
            }
        }
        if std::env::var("CHORUS_DEFAULT_MODEL").is_err() {
            if let Some(model) = settings.default_model {
                self.default_model = model;
            }
        }
        if std::env::var("CHORUS_TIMEOUT_SECS").is_err() {
            if let Some(timeout_secs) = settings.timeout_secs {
                self.timeout_secs = timeout_secs;
            }
        }
    }
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("CHORUS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("CHORUS_PORT")
                    .unwrap_or_else(|_| "7860".to_string())
                    .parse()
                    .unwrap_or(7860),
            },
            storage: StorageConfig {
                data_dir: std::env::var("CHORUS_DATA_DIR")
                    .unwrap_or_else(|_| "data".to_string())
                    .into(),
            },
            completion: CompletionConfig {
                api_base: std::env::var("CHORUS_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
                api_key: std::env::var("CHORUS_API_KEY").ok().filter(|k| !k.is_empty()),
                default_model: std::env::var("CHORUS_DEFAULT_MODEL")
                    .unwrap_or_else(|_| DEFAULT_MODELS[0].to_string()),
                timeout_secs: std::env::var("CHORUS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
                models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            },
        }
    }
}

impl Config {
    /// Configuration rooted at an explicit data directory (tests, embedding)
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.storage.data_dir = data_dir.into();
        config
    }
}
