//! Ollama chat provider, non-streaming `/api/chat`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::trace;

use braid_core::LlmSettings;

use crate::chat::{ChatMessage, TextGenerationProvider};
use crate::error::LlmError;

/// Chat provider backed by a local Ollama daemon.
pub struct OllamaChatProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaChatProvider {
    /// Build a provider from settings.
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl TextGenerationProvider for OllamaChatProvider {
    async fn complete(&self, prompt: &str, history: &[ChatMessage]) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.base_url);
        let mut messages = history.to_vec();
        messages.push(ChatMessage::user(prompt));
        trace!(model = %self.model, turns = messages.len(), "requesting ollama completion");
        let response = self
            .client
            .post(&url)
            .json(&ChatRequest {
                model: &self.model,
                messages: &messages,
                stream: false,
                options: ChatOptions {
                    temperature: self.temperature,
                },
            })
            .send()
            .await?
            .error_for_status()?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        Ok(body.message.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
