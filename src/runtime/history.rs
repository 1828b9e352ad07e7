/// Conversation history
///
/// Append-only log of user and assistant messages for one session, with a
/// plain-text export.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Display form: "[timestamp]\nrole: content\n" per message
    pub fn formatted(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("[{}]\n{}: {}\n", m.timestamp.to_rfc3339(), m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Export form: "[timestamp] role: content" followed by a blank line
    pub fn export_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("[{}] {}: {}\n\n", m.timestamp.to_rfc3339(), m.role, m.content))
            .collect()
    }

    /// Write the export into `dir` as conversation_YYYYmmdd_HHMMSS.txt
    ///
    /// Exports within the same second get a `_N` suffix instead of replacing
    /// each other.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let stem = format!("conversation_{}", Local::now().format("%Y%m%d_%H%M%S"));
        let text = self.export_text();
        let mut attempt = 0;
        loop {
            let filename = match attempt {
                0 => format!("{stem}.txt"),
                n => format!("{stem}_{n}.txt"),
            };
            let path = dir.join(filename);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(text.as_bytes())
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e).with_context(|| format!("failed to create {}", path.display())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_one_entry_per_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = ConversationHistory::new();
        history.push(Message::user("hello"));
        history.push(Message::assistant("hi there"));

        let path = history.export_to_dir(&dir.path().join("conversations")).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("conversation_") && name.ends_with(".txt"));
        let text = std::fs::read_to_string(&path).unwrap();
        let entries: Vec<&str> = text.split("\n\n").filter(|e| !e.is_empty()).collect();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].starts_with('[') && entries[0].ends_with("] user: hello"));
        assert!(entries[1].ends_with("] assistant: hi there"));
    }

    #[test]
    fn formatted_puts_role_on_second_line() {
        let mut history = ConversationHistory::new();
        history.push(Message::user("ping"));

        let formatted = history.formatted();
        let lines: Vec<&str> = formatted.lines().collect();
        assert!(lines[0].starts_with('['));
        assert_eq!(lines[1], "user: ping");
    }

    #[test]
    fn repeated_exports_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = ConversationHistory::new();
        history.push(Message::user("first"));
        let first = history.export_to_dir(dir.path()).unwrap();

        history.push(Message::user("second"));
        let second = history.export_to_dir(dir.path()).unwrap();
        let third = history.export_to_dir(dir.path()).unwrap();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert!(!std::fs::read_to_string(&first).unwrap().contains("second"));
        assert!(std::fs::read_to_string(&third).unwrap().contains("second"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }
}
