/// In-memory assistant store backed by the YAML config file
///
/// Holds assistants in insertion order (built-ins first). Every mutation rewrites
/// the whole config file; there is no incremental persistence.

use crate::{
    assistant::{
        storage::AssistantConfigFile,
        types::{default_assistants, derive_id, Assistant, AssistantUpdate},
    },
    error::StoreError,
};
use std::collections::HashMap;

/// Read-only id → assistant lookup handed to the execution engine for one run
pub type Roster = HashMap<String, Assistant>;

/// Durable mapping of assistant id to persona
#[derive(Debug)]
pub struct AssistantStore {
    /// Insertion-ordered entries; ids are unique
    assistants: Vec<Assistant>,
    storage: AssistantConfigFile,
}

impl AssistantStore {
    /// Seed the built-ins, then merge saved entries over them by id
    ///
    /// An unreadable config file is logged and leaves only the built-ins.
    pub fn load(storage: AssistantConfigFile) -> Self {
        let mut store = Self {
            assistants: default_assistants(),
            storage,
        };
        tracing::info!("🧩 Loaded {} built-in assistants", store.assistants.len());

        match store.storage.load_assistants() {
            Ok(saved) => {
                let count = saved.len();
                for assistant in saved {
                    store.upsert(assistant);
                }
                tracing::info!("📥 Merged {} saved assistants from {}", count, store.storage.path().display());
            }
            Err(e) => {
                tracing::error!("❌ Failed to load saved assistants: {:#}", e);
            }
        }

        store
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.assistants.iter().position(|a| a.id == id)
    }

    fn upsert(&mut self, assistant: Assistant) {
        match self.position(&assistant.id) {
            Some(index) => self.assistants[index] = assistant,
            None => self.assistants.push(assistant),
        }
    }

    /// Create an assistant; its id is derived from `name`
    pub fn add(&mut self, name: &str, role: &str, prompt: &str) -> Result<Assistant, StoreError> {
        if name.trim().is_empty() {
            tracing::error!("❌ Failed to add assistant: empty name");
            return Err(StoreError::EmptyName);
        }

        let id = derive_id(name);
        if self.position(&id).is_some() {
            tracing::error!("❌ Failed to add assistant '{}': id '{}' already exists", name, id);
            return Err(StoreError::DuplicateId(id));
        }

        let assistant = Assistant::new(name, role, prompt);
        self.assistants.push(assistant.clone());
        self.persist()?;

        tracing::info!("➕ Added assistant: {} ({})", assistant.name, assistant.id);
        Ok(assistant)
    }

    /// Apply a partial update; the id never changes
    pub fn update(&mut self, id: &str, update: AssistantUpdate) -> Result<Assistant, StoreError> {
        let Some(index) = self.position(id) else {
            tracing::error!("❌ Failed to update assistant: '{}' does not exist", id);
            return Err(StoreError::assistant_not_found(id));
        };

        update.apply_to(&mut self.assistants[index]);
        let updated = self.assistants[index].clone();
        self.persist()?;

        tracing::info!("✏️ Updated assistant: {}", id);
        Ok(updated)
    }

    /// Remove an assistant
    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let Some(index) = self.position(id) else {
            tracing::warn!("⚠️ Cannot delete assistant '{}': not found", id);
            return Err(StoreError::assistant_not_found(id));
        };

        self.assistants.remove(index);
        self.persist()?;

        tracing::info!("🗑️ Deleted assistant: {}", id);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Assistant> {
        self.assistants.iter().find(|a| a.id == id)
    }

    /// All assistants in insertion order, built-ins first
    pub fn list(&self) -> &[Assistant] {
        &self.assistants
    }

    /// "Name (Role)" labels in list order
    pub fn choices(&self) -> Vec<String> {
        self.assistants.iter().map(Assistant::choice_label).collect()
    }

    /// Snapshot for a workflow run
    pub fn roster(&self) -> Roster {
        self.assistants
            .iter()
            .map(|a| (a.id.clone(), a.clone()))
            .collect()
    }

    /// Rewrite the backing file
    ///
    /// On failure the in-memory change stays; the next successful save writes it.
    fn persist(&self) -> Result<(), StoreError> {
        self.storage.save_assistants(&self.assistants).map_err(|e| {
            tracing::error!("❌ Failed to save assistants to {}: {:#}", self.storage.path().display(), e);
            StoreError::Persistence(e.to_string())
        })?;
        tracing::debug!("💾 Saved {} assistants", self.assistants.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> AssistantStore {
        AssistantStore::load(AssistantConfigFile::new(dir.path().join("config.yaml")))
    }

    #[test]
    fn first_load_has_builtins_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let ids: Vec<&str> = store.list().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["code_expert", "reviewer", "architect"]);
        assert_eq!(store.choices()[1], "Code Reviewer (Review Expert)");
    }

    #[test]
    fn duplicate_id_is_rejected_and_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("Test Writer", "QA", "write tests").unwrap();
        let before = store.list().to_vec();

        let err = store.add("test writer", "Other", "other").unwrap_err();

        assert_eq!(err, StoreError::DuplicateId("test_writer".to_string()));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn deleting_unknown_id_fails_without_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let before = store.list().to_vec();

        assert!(matches!(store.delete("ghost"), Err(StoreError::NotFound { .. })));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn second_delete_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.delete("reviewer").unwrap();
        assert_eq!(store.delete("reviewer"), Err(StoreError::assistant_not_found("reviewer")));
        assert!(store.get("reviewer").is_none());
    }

    #[test]
    fn update_of_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let err = store.update("ghost", AssistantUpdate::default()).unwrap_err();
        assert_eq!(err, StoreError::assistant_not_found("ghost"));
    }

    #[test]
    fn mutations_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = store_in(&dir);
            store.add("Test Writer", "QA", "write tests").unwrap();
            store
                .update(
                    "architect",
                    AssistantUpdate {
                        prompt: Some("Design carefully.".to_string()),
                        ..Default::default()
                    },
                )
                .unwrap();
        }

        let reloaded = store_in(&dir);
        let ids: Vec<&str> = reloaded.list().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["code_expert", "reviewer", "architect", "test_writer"]);
        assert_eq!(reloaded.get("architect").unwrap().prompt, "Design carefully.");
    }

    #[test]
    fn builtins_return_after_being_deleted_from_file() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = store_in(&dir);
            store.delete("code_expert").unwrap();
        }

        let reloaded = store_in(&dir);
        assert!(reloaded.get("code_expert").is_some());
    }

    #[test]
    fn rewrite_preserves_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "github_link: https://example.com/repo\napi_settings:\n  default_model: gpt-4\n",
        )
        .unwrap();

        let mut store = AssistantStore::load(AssistantConfigFile::new(&path));
        store.add("Linter", "Style", "lint").unwrap();

        let file = AssistantConfigFile::new(&path);
        let settings = file.load_api_settings().unwrap().unwrap();
        assert_eq!(settings.default_model.as_deref(), Some("gpt-4"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("github_link"));
        assert_eq!(file.load_assistants().unwrap().len(), 4);
    }

    #[test]
    fn corrupt_file_leaves_builtins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.yaml"), "assistants: [unclosed").unwrap();

        let store = store_in(&dir);
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn corrupt_file_is_backed_up_before_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "assistants: [unclosed").unwrap();

        let mut store = store_in(&dir);
        store.add("Other", "Helper", "help").unwrap();

        let backup = std::fs::read_to_string(dir.path().join("config.yaml.bak")).unwrap();
        assert_eq!(backup, "assistants: [unclosed");
    }

    #[test]
    fn offsetless_timestamps_load_and_survive_the_next_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "assistants:\n\
             - id: my_helper\n  name: My Helper\n  role: Helper\n  prompt: Be helpful.\n  \
             created_at: '2024-05-01T10:00:00.123456'\n  modified_at: ''\n",
        )
        .unwrap();

        let mut store = store_in(&dir);
        assert_eq!(store.get("my_helper").unwrap().name, "My Helper");

        store.add("Other", "Helper", "help").unwrap();

        let saved = AssistantConfigFile::new(&path).load_assistants().unwrap();
        let ids: Vec<&str> = saved.iter().map(|a| a.id.as_str()).collect();
        assert!(ids.contains(&"my_helper"));
        assert!(ids.contains(&"other"));
        assert!(!dir.path().join("config.yaml.bak").exists());
    }

    #[test]
    fn bad_entry_is_skipped_and_file_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let original = "assistants:\n\
                        - id: broken\n  name: Broken\n\
                        - id: good\n  name: Good\n  role: Helper\n  prompt: ok\n";
        std::fs::write(&path, original).unwrap();

        let store = store_in(&dir);

        assert!(store.get("good").is_some());
        assert!(store.get("broken").is_none());
        assert_eq!(std::fs::read_to_string(dir.path().join("config.yaml.bak")).unwrap(), original);
    }
}
