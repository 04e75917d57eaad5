//! Chat completion payloads handed to the external transport.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::infra::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for a chat completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// A single user message for `model`.
    pub fn user(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: content.into(),
            }],
        }
    }

    pub fn from_config(config: &Config, content: impl Into<String>) -> Self {
        Self::user(config.defaults.model(), content)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to serialize completion request")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

impl CompletionResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).context("invalid completion response body")
    }

    /// Content of the first choice, if the response carries any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
    }
}
