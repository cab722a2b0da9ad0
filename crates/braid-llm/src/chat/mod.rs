//! Text-generation providers.

mod mock;
mod ollama;
mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use braid_core::{LlmSettings, ProviderKind};

use crate::error::LlmError;

pub use mock::MockChatProvider;
pub use ollama::OllamaChatProvider;
pub use openai::OpenAiChatProvider;

/// One turn of a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user`, or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// An assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A source of chat completions.
#[async_trait]
pub trait TextGenerationProvider: Send + Sync {
    /// Complete `prompt` given prior `history`, returning the reply text.
    async fn complete(&self, prompt: &str, history: &[ChatMessage]) -> Result<String, LlmError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// Build a chat provider from settings.
pub fn create_chat_provider(
    settings: &LlmSettings,
) -> Result<Arc<dyn TextGenerationProvider>, LlmError> {
    match settings.provider {
        ProviderKind::Ollama => Ok(Arc::new(OllamaChatProvider::new(settings)?)),
        ProviderKind::OpenAI => Ok(Arc::new(OpenAiChatProvider::new(settings)?)),
        ProviderKind::Mock => Ok(Arc::new(MockChatProvider::new())),
    }
}
