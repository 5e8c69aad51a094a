//! The seam between the chat endpoint and the hosted model.
//!
//! The endpoint only needs "send these parameters, give me the events".
//! [`crate::Anthropic`] implements it over HTTP; tests script it directly.

use std::pin::Pin;

use futures::Stream;

use crate::Result;
use crate::types::{MessageCreateParams, MessageStreamEvent};

/// A boxed, sendable stream of provider events.
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<MessageStreamEvent>> + Send>>;

/// A hosted model that streams replies.
#[async_trait::async_trait]
pub trait ModelProvider: Send + Sync {
    /// Issue exactly one streaming request.
    ///
    /// An `Err` means nothing was streamed; errors after the first event
    /// arrive inside the returned stream.
    async fn stream(&self, params: MessageCreateParams) -> Result<MessageStream>;
}
