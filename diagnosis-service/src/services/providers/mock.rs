//! Mock provider implementation for testing.

use super::{Capability, GenerativeModel, ProviderError};
use crate::services::prompt::GenerationInput;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// What the mock does when invoked.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Blocked,
    Fail(String),
    /// Sleep before replying, to exercise timeouts.
    Delay(Duration, String),
}

/// Scripted model that records the last input it received.
pub struct MockModel {
    name: String,
    capability: Capability,
    reply: MockReply,
    last_input: Mutex<Option<GenerationInput>>,
}

impl MockModel {
    pub fn new(name: impl Into<String>, capability: Capability, reply: MockReply) -> Self {
        Self {
            name: name.into(),
            capability,
            reply,
            last_input: Mutex::new(None),
        }
    }

    pub fn vision(reply: MockReply) -> Self {
        Self::new("mock-vision", Capability::Vision, reply)
    }

    pub fn text_only(reply: MockReply) -> Self {
        Self::new("mock-text", Capability::TextOnly, reply)
    }

    pub fn last_input(&self) -> Option<GenerationInput> {
        self.last_input
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Capability {
        self.capability
    }

    async fn generate(&self, input: &GenerationInput) -> Result<String, ProviderError> {
        if let Ok(mut guard) = self.last_input.lock() {
            *guard = Some(input.clone());
        }

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Blocked => Err(ProviderError::ContentFiltered(
                "mock safety block".to_string(),
            )),
            MockReply::Fail(msg) => Err(ProviderError::ApiError(msg.clone())),
            MockReply::Delay(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(text.clone())
            }
        }
    }
}
