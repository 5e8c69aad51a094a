use serde::{Deserialize, Serialize};

use crate::types::{ContentBlockDelta, Usage};

/// Metadata announced at the start of a streamed message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamedMessage {
    /// Unique object identifier.
    #[serde(default)]
    pub id: String,

    /// The model that handled the request.
    #[serde(default)]
    pub model: String,

    /// Usage reported so far.
    #[serde(default)]
    pub usage: Usage,
}

/// The `message_start` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageStartEvent {
    /// The message being started.
    pub message: StreamedMessage,
}

/// Top-level changes to the message, such as the stop reason.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDelta {
    /// Why generation stopped, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

/// The `message_delta` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDeltaEvent {
    /// The delta to the message.
    #[serde(default)]
    pub delta: MessageDelta,

    /// Cumulative usage.
    #[serde(default)]
    pub usage: Usage,
}

/// The `content_block_start` event.
///
/// The block itself is kept opaque; the chat endpoint only forwards deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlockStartEvent {
    /// The block being started.
    pub content_block: serde_json::Value,

    /// The index of the content block.
    pub index: usize,
}

/// The `content_block_delta` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlockDeltaEvent {
    /// The delta update to the content block.
    pub delta: ContentBlockDelta,

    /// The index of the content block being updated.
    pub index: usize,
}

impl ContentBlockDeltaEvent {
    /// Create a new `ContentBlockDeltaEvent` with the given delta and index.
    pub fn new(delta: ContentBlockDelta, index: usize) -> Self {
        Self { delta, index }
    }
}

/// The `content_block_stop` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlockStopEvent {
    /// The index of the content block that finished.
    pub index: usize,
}

/// Error details carried by an in-band `error` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamErrorDetail {
    /// The provider's error type, e.g. `overloaded_error`.
    #[serde(rename = "type", default)]
    pub error_type: String,

    /// Human-readable error message.
    #[serde(default)]
    pub message: String,
}

/// The `error` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamErrorEvent {
    /// What went wrong.
    pub error: StreamErrorDetail,
}

/// An event in a message stream.
///
/// Events arrive in order: `message_start`, then content block events, then
/// `message_delta` and finally `message_stop`.  Pings may appear anywhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MessageStreamEvent {
    /// A keep-alive with no payload.
    #[serde(rename = "ping")]
    Ping,

    /// Indicates the start of a new message in the stream.
    #[serde(rename = "message_start")]
    MessageStart(MessageStartEvent),

    /// Provides incremental updates to the message being generated.
    #[serde(rename = "message_delta")]
    MessageDelta(MessageDeltaEvent),

    /// Marks the beginning of a new content block within the message.
    #[serde(rename = "content_block_start")]
    ContentBlockStart(ContentBlockStartEvent),

    /// Provides incremental updates to the current content block.
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta(ContentBlockDeltaEvent),

    /// Indicates that the current content block is complete.
    #[serde(rename = "content_block_stop")]
    ContentBlockStop(ContentBlockStopEvent),

    /// Marks the end of the message stream.
    #[serde(rename = "message_stop")]
    MessageStop,

    /// The provider failed after the stream began.
    #[serde(rename = "error")]
    Error(StreamErrorEvent),

    /// An event type introduced after this crate was written.
    #[serde(other)]
    Unknown,
}

impl MessageStreamEvent {
    /// Returns the text fragment carried by this event, if any.
    ///
    /// Only `content_block_delta` events with a `text_delta` carry fragments.
    pub fn text_fragment(&self) -> Option<&str> {
        match self {
            MessageStreamEvent::ContentBlockDelta(event) => event.delta.as_text(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json};

    #[test]
    fn message_start_deserializes() {
        let event: MessageStreamEvent = from_value(json!({
            "type": "message_start",
            "message": {
                "id": "msg_012345",
                "type": "message",
                "role": "assistant",
                "content": [],
                "model": "claude-sonnet-4-5-20250929",
                "stop_reason": null,
                "usage": {"input_tokens": 50, "output_tokens": 1}
            }
        }))
        .unwrap();
        match event {
            MessageStreamEvent::MessageStart(start) => {
                assert_eq!(start.message.id, "msg_012345");
                assert_eq!(start.message.usage.input_tokens, 50);
            }
            _ => panic!("Expected MessageStart variant"),
        }
    }

    #[test]
    fn text_delta_yields_fragment() {
        let event: MessageStreamEvent = from_value(json!({
            "type": "content_block_delta",
            "index": 0,
            "delta": {"type": "text_delta", "text": "Hello"}
        }))
        .unwrap();
        assert_eq!(event.text_fragment(), Some("Hello"));
    }

    #[test]
    fn block_markers_carry_no_fragment() {
        let start: MessageStreamEvent = from_value(json!({
            "type": "content_block_start",
            "index": 0,
            "content_block": {"type": "text", "text": ""}
        }))
        .unwrap();
        let stop: MessageStreamEvent = from_value(json!({
            "type": "content_block_stop",
            "index": 0
        }))
        .unwrap();
        assert!(start.text_fragment().is_none());
        assert!(stop.text_fragment().is_none());
    }

    #[test]
    fn message_stop_and_ping() {
        let stop: MessageStreamEvent = from_value(json!({"type": "message_stop"})).unwrap();
        assert_eq!(stop, MessageStreamEvent::MessageStop);
        let ping: MessageStreamEvent = from_value(json!({"type": "ping"})).unwrap();
        assert_eq!(ping, MessageStreamEvent::Ping);
    }

    #[test]
    fn message_delta_reports_stop_reason() {
        let event: MessageStreamEvent = from_value(json!({
            "type": "message_delta",
            "delta": {"stop_reason": "end_turn", "stop_sequence": null},
            "usage": {"output_tokens": 15}
        }))
        .unwrap();
        match event {
            MessageStreamEvent::MessageDelta(delta) => {
                assert_eq!(delta.delta.stop_reason.as_deref(), Some("end_turn"));
                assert_eq!(delta.usage.output_tokens, 15);
            }
            _ => panic!("Expected MessageDelta variant"),
        }
    }

    #[test]
    fn error_event_deserializes() {
        let event: MessageStreamEvent = from_value(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        }))
        .unwrap();
        match event {
            MessageStreamEvent::Error(err) => {
                assert_eq!(err.error.error_type, "overloaded_error");
                assert_eq!(err.error.message, "Overloaded");
            }
            _ => panic!("Expected Error variant"),
        }
    }

    #[test]
    fn unknown_event_types_are_tolerated() {
        let event: MessageStreamEvent =
            from_value(json!({"type": "brand_new_event", "payload": 1})).unwrap();
        assert_eq!(event, MessageStreamEvent::Unknown);
    }
}
