use serde::{Deserialize, Serialize};

use crate::types::{MessageParam, Model};

/// Parameters for a streamed message creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCreateParams {
    /// The model that will complete the prompt.
    pub model: Model,

    /// The maximum number of tokens to generate before stopping.
    pub max_tokens: u32,

    /// Input messages.
    pub messages: Vec<MessageParam>,

    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Whether to incrementally stream the response using server-sent events.
    #[serde(default)]
    pub stream: bool,
}

impl MessageCreateParams {
    /// Create a new streaming request with the required fields.
    pub fn new(max_tokens: u32, messages: Vec<MessageParam>, model: Model) -> Self {
        Self {
            model,
            max_tokens,
            messages,
            system: None,
            stream: true,
        }
    }

    /// Sets the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}
