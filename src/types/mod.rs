// Public modules
pub mod content_block_delta;
pub mod message_create_params;
pub mod message_param;
pub mod message_stream_event;
pub mod model;
pub mod usage;

// Re-exports
pub use content_block_delta::{ContentBlockDelta, TextDelta};
pub use message_create_params::MessageCreateParams;
pub use message_param::{MessageParam, MessageRole};
pub use message_stream_event::{
    ContentBlockDeltaEvent, ContentBlockStartEvent, ContentBlockStopEvent, MessageDeltaEvent,
    MessageDelta, MessageStartEvent, MessageStreamEvent, StreamErrorDetail, StreamErrorEvent,
    StreamedMessage,
};
pub use model::{KnownModel, Model};
pub use usage::Usage;
