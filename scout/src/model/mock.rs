//! Mock model implementation for testing.
//!
//! Returns scripted messages in sequence, cycling through them. Useful for
//! unit testing the agent loop without a live host: a script can carry a
//! tool-call turn followed by a final answer.

use super::{GenerateOptions, Model, ModelResponse};
use crate::error::Result;
use crate::message::ChatMessage;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A scripted mock model for testing.
///
/// # Example
///
/// ```rust,ignore
/// use scout::prelude::*;
///
/// let model = MockModel::new(vec![
///     ChatMessage::assistant("Hello!"),
///     ChatMessage::assistant("Goodbye!"),
/// ]);
/// // First call returns "Hello!", second "Goodbye!", third "Hello!" again...
/// ```
#[derive(Debug)]
pub struct MockModel {
    model_id: String,
    responses: Vec<ChatMessage>,
    response_index: AtomicUsize,
}

impl MockModel {
    /// Create a new mock model with scripted response messages.
    #[must_use]
    pub fn new(responses: Vec<ChatMessage>) -> Self {
        Self {
            model_id: "mock-model".to_string(),
            responses,
            response_index: AtomicUsize::new(0),
        }
    }

    /// Create a mock model with a custom model ID.
    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

#[async_trait]
impl Model for MockModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(
        &self,
        _messages: &[ChatMessage],
        _options: &GenerateOptions,
    ) -> Result<ModelResponse> {
        if self.responses.is_empty() {
            return Ok(ModelResponse::new(ChatMessage::assistant("No response")));
        }

        let index = self.response_index.fetch_add(1, Ordering::SeqCst);
        let message = self
            .responses
            .get(index % self.responses.len())
            .cloned()
            .unwrap_or_else(|| ChatMessage::assistant("No response"));

        Ok(ModelResponse::new(message))
    }
}
