//! Scripted in-process chat provider for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::chat::{ChatMessage, TextGenerationProvider};
use crate::error::LlmError;

/// Chat provider that replays scripted replies in order.
///
/// Once the script runs dry it echoes the prompt back, so tests that
/// only care about earlier turns keep working.
#[derive(Default)]
pub struct MockChatProvider {
    script: Mutex<VecDeque<String>>,
    fail: bool,
}

impl MockChatProvider {
    /// Provider that echoes every prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a scripted reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.script
            .lock()
            .expect("mock chat script poisoned")
            .push_back(reply.into());
        self
    }

    /// Provider whose every call fails.
    pub fn failing() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl TextGenerationProvider for MockChatProvider {
    async fn complete(&self, prompt: &str, _history: &[ChatMessage]) -> Result<String, LlmError> {
        if self.fail {
            return Err(LlmError::InvalidResponse(
                "mock provider configured to fail".to_string(),
            ));
        }
        let scripted = self
            .script
            .lock()
            .expect("mock chat script poisoned")
            .pop_front();
        Ok(scripted.unwrap_or_else(|| prompt.to_string()))
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
