/// YAML persistence for the assistant store
///
/// The config file is a YAML mapping. The store owns only its `assistants` key;
/// other top-level keys (e.g. `api_settings`, `github_link`) are read for settings
/// and carried through untouched on every rewrite.

use crate::{
    assistant::types::Assistant,
    config::ApiSettings,
    persist::{back_up, write_whole_file},
};
use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

const ASSISTANTS_KEY: &str = "assistants";
const API_SETTINGS_KEY: &str = "api_settings";

/// Handle to the assistant config file
#[derive(Debug, Clone)]
pub struct AssistantConfigFile {
    path: PathBuf,
}

impl AssistantConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document; a missing or empty file is an empty mapping
    fn read_document(&self) -> Result<Mapping> {
        if !self.path.exists() {
            return Ok(Mapping::new());
        }

        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(Mapping::new());
        }

        let value: Value = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        match value {
            Value::Mapping(mapping) => Ok(mapping),
            Value::Null => Ok(Mapping::new()),
            _ => bail!("{} is not a YAML mapping", self.path.display()),
        }
    }

    /// Load the saved assistant entries (empty when the key is absent)
    ///
    /// Entries that fail to parse are logged and skipped. Whenever part of the file
    /// could not be read it is backed up first, so the next save cannot lose it.
    pub fn load_assistants(&self) -> Result<Vec<Assistant>> {
        let document = self.read_document().inspect_err(|_| self.preserve_original())?;

        let entries = match document.get(ASSISTANTS_KEY) {
            Some(Value::Null) | None => return Ok(Vec::new()),
            Some(Value::Sequence(entries)) => entries,
            Some(_) => {
                self.preserve_original();
                bail!("'{}' in {} is not a list", ASSISTANTS_KEY, self.path.display());
            }
        };

        let mut assistants = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match serde_yaml::from_value::<Assistant>(entry.clone()) {
                Ok(assistant) => assistants.push(assistant),
                Err(e) => tracing::warn!(
                    "⚠️ Skipping assistant entry {} in {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                ),
            }
        }

        if assistants.len() < entries.len() {
            self.preserve_original();
        }
        Ok(assistants)
    }

    /// Load the optional `api_settings` section
    pub fn load_api_settings(&self) -> Result<Option<ApiSettings>> {
        let document = self.read_document()?;
        match document.get(API_SETTINGS_KEY) {
            Some(Value::Null) | None => Ok(None),
            Some(section) => serde_yaml::from_value(section.clone())
                .map(Some)
                .with_context(|| format!("invalid '{}' section in {}", API_SETTINGS_KEY, self.path.display())),
        }
    }

    /// Rewrite the file with `assistants`, keeping every other top-level key
    pub fn save_assistants(&self, assistants: &[Assistant]) -> Result<()> {
        let mut document = match self.read_document() {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("⚠️ Existing assistant config unreadable, rewriting from scratch: {:#}", e);
                self.preserve_original();
                Mapping::new()
            }
        };

        document.insert(
            Value::String(ASSISTANTS_KEY.to_string()),
            serde_yaml::to_value(assistants)?,
        );

        let text = serde_yaml::to_string(&Value::Mapping(document))?;
        write_whole_file(&self.path, text.as_bytes())
    }

    /// Keep a `.bak` copy of a file that is about to lose content
    fn preserve_original(&self) {
        if !self.path.exists() {
            return;
        }
        if let Err(e) = back_up(&self.path) {
            tracing::error!("❌ {:#}", e);
        }
    }
}
