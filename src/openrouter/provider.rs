use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A chat-completion backend addressed by model identifier. The engine only
/// depends on this trait, so tests substitute canned responses.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String>;
}

/// The fixed provider set the engine fans out across. Each is one model
/// behind the unified gateway endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    ChatGpt,
    Claude,
    Gemini,
}

impl AiProvider {
    pub fn all() -> [AiProvider; 3] {
        [AiProvider::ChatGpt, AiProvider::Claude, AiProvider::Gemini]
    }

    pub fn model_id(&self) -> &'static str {
        match self {
            AiProvider::ChatGpt => "openai/gpt-4",
            AiProvider::Claude => "anthropic/claude-3-sonnet",
            AiProvider::Gemini => "google/gemini-pro",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AiProvider::ChatGpt => "ChatGPT",
            AiProvider::Claude => "Claude",
            AiProvider::Gemini => "Gemini",
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
