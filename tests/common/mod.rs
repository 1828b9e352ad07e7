#![allow(dead_code)]

use async_trait::async_trait;
use chorus::{
    assistant::{Assistant, Roster},
    runtime::{ApiError, CompletionClient},
};
use std::sync::Mutex;

/// One completion call as the backend saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub system_context: String,
    pub user_message: String,
    pub model: String,
}

/// Backend that answers by assistant name
///
/// Each rule pairs a needle with a reply; the first rule whose needle appears
/// in the system context wins. Replies may use `{input}` to echo the user message.
/// Without a matching rule the call fails.
#[derive(Default)]
pub struct ScriptedClient {
    rules: Vec<(String, Result<String, ApiError>)>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, needle: &str, template: &str) -> Self {
        self.rules.push((needle.to_string(), Ok(template.to_string())));
        self
    }

    pub fn fail(mut self, needle: &str, cause: &str) -> Self {
        self.rules.push((needle.to_string(), Err(ApiError::new(cause))));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, system_context: &str, user_message: &str, model: &str) -> Result<String, ApiError> {
        self.calls.lock().unwrap().push(Call {
            system_context: system_context.to_string(),
            user_message: user_message.to_string(),
            model: model.to_string(),
        });

        let rule = self
            .rules
            .iter()
            .find(|(needle, _)| system_context.contains(needle.as_str()));

        match rule {
            Some((_, Ok(template))) => Ok(template.replace("{input}", user_message)),
            Some((_, Err(e))) => Err(e.clone()),
            None => Err(ApiError::new("no scripted reply")),
        }
    }
}

/// Roster of single-letter assistants: id "a" is named "Alpha", and so on
pub fn roster(ids: &[&str]) -> Roster {
    ids.iter()
        .map(|id| {
            let assistant = Assistant::with_id(*id, persona_name(id), "Tester", format!("Answer as {}.", id));
            (id.to_string(), assistant)
        })
        .collect()
}

pub fn persona_name(id: &str) -> String {
    match id {
        "a" => "Alpha".to_string(),
        "b" => "Bravo".to_string(),
        "c" => "Charlie".to_string(),
        "d" => "Delta".to_string(),
        other => format!("Persona {}", other),
    }
}
