use serde::{Deserialize, Serialize};

/// A text delta, representing a piece of text in a streaming response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDelta {
    /// The text content.
    pub text: String,
}

impl TextDelta {
    /// Create a new `TextDelta` with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A streaming update to a content block.
///
/// Only text deltas carry fragments the chat endpoint forwards.  Every other
/// delta kind (tool input JSON, thinking, signatures, citations) is accepted
/// and surfaces as [`ContentBlockDelta::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlockDelta {
    /// A text delta.
    #[serde(rename = "text_delta")]
    TextDelta(TextDelta),

    /// Any delta kind this crate does not interpret.
    #[serde(other)]
    Other,
}

impl ContentBlockDelta {
    /// Returns the text carried by this delta, if it is a text delta.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlockDelta::TextDelta(delta) => Some(&delta.text),
            ContentBlockDelta::Other => None,
        }
    }
}
