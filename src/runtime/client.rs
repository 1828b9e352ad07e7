/// Completion client adapter
///
/// The only component that performs network I/O. `CompletionClient` is the seam
/// the execution engine calls through; `OpenAiClient` implements it against any
/// OpenAI-compatible `/chat/completions` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Any failure of a completion call, normalized to a readable cause
///
/// Covers network failure, authentication failure, rate limiting, non-success
/// status and malformed responses. Never retried by the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{cause}")]
pub struct ApiError {
    pub cause: String,
}

impl ApiError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self { cause: cause.into() }
    }
}

/// Chat-completion backend
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one system + user exchange and return the assistant's text
    async fn complete(&self, system_context: &str, user_message: &str, model: &str) -> Result<String, ApiError>;
}

/// API key and endpoint for the completion backend
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub api_base: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible HTTP client
///
/// POST {api_base}/chat/completions
/// Headers:
///   Authorization: Bearer {api_key}
#[derive(Debug)]
pub struct OpenAiClient {
    http: reqwest::Client,
    credentials: Credentials,
}

impl OpenAiClient {
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self, ApiError> {
        if credentials.api_key.trim().is_empty() {
            return Err(ApiError::new("API key must not be empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::new(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, credentials })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.credentials.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system_context: &str, user_message: &str, model: &str) -> Result<String, ApiError> {
        let url = self.endpoint();
        let body = ChatRequest {
            model,
            messages: [
                ChatMessage { role: "system", content: system_context },
                ChatMessage { role: "user", content: user_message },
            ],
        };

        tracing::debug!("🌍 Completion request: POST {} (model: {})", url, model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.credentials.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::new(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::new(format!("failed to read response body: {}", e)))?;

        tracing::debug!("📡 Completion response status: {}", status);

        match status.as_u16() {
            401 | 403 => return Err(ApiError::new(format!("authentication failed ({}): {}", status, text))),
            429 => return Err(ApiError::new(format!("rate limited ({}): {}", status, text))),
            _ if !status.is_success() => return Err(ApiError::new(format!("API returned {}: {}", status, text))),
            _ => {}
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::new(format!("malformed response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ApiError::new("malformed response: no message content in choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        let credentials = Credentials {
            api_key: "  ".to_string(),
            api_base: "http://localhost".to_string(),
        };
        let err = OpenAiClient::new(credentials, Duration::from_secs(1)).unwrap_err();
        assert_eq!(err.cause, "API key must not be empty");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let credentials = Credentials {
            api_key: "sk-test".to_string(),
            api_base: "https://api.example.com/v1/".to_string(),
        };
        let client = OpenAiClient::new(credentials, Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn debug_redacts_key() {
        let credentials = Credentials {
            api_key: "sk-secret".to_string(),
            api_base: "https://api.example.com".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("sk-secret"));
    }
}
