//! Chat session state.
//!
//! [`ChatSession`] owns the transcript and the input buffer and does no I/O.
//! A submission hands out a [`Turn`] ticket; every streamed update must be
//! applied with the ticket it belongs to, and updates for a ticket the
//! session no longer recognizes are dropped.

use crate::observability::{CLIENT_STALE_UPDATES, CLIENT_TURN_FAILURES, CLIENT_TURNS};
use crate::types::MessageRole;

/// Where the session is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready for input.
    Idle,
    /// A request was issued and no response has arrived yet.
    Sending,
    /// Fragments are arriving.
    Streaming,
}

/// One entry in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Who wrote it.
    pub role: MessageRole,
    /// What they wrote.
    pub content: String,
}

impl ChatMessage {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ticket for one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    generation: u64,
    message: String,
}

impl Turn {
    /// The text to send.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Something that happened to an in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// The endpoint accepted the request and began streaming.
    Started,
    /// A text fragment to append to the reply.
    Fragment(String),
    /// The completion marker arrived.
    Completed,
    /// The request failed; the reply becomes this text.
    Failed(String),
    /// The user abandoned the reply; whatever arrived is kept.
    Interrupted,
}

/// Transcript and request state for one conversation.
#[derive(Debug)]
pub struct ChatSession {
    input: String,
    messages: Vec<ChatMessage>,
    phase: Phase,
    generation: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// An empty, idle session.
    pub fn new() -> Self {
        Self {
            input: String::new(),
            messages: Vec::new(),
            phase: Phase::Idle,
            generation: 0,
        }
    }

    /// Replace the pending input.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// The pending input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The transcript, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a request is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// The latest assistant reply, if any.
    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == MessageRole::Assistant)
            .map(|m| m.content.as_str())
    }

    /// Start a turn with the pending input.
    ///
    /// Returns `None`, leaving everything untouched, when the input is blank
    /// or another turn is still in flight.  Otherwise the user message and an
    /// empty assistant placeholder are appended and the input is cleared.
    pub fn submit(&mut self) -> Option<Turn> {
        if self.is_in_flight() {
            return None;
        }
        let message = self.input.trim();
        if message.is_empty() {
            return None;
        }
        let message = message.to_string();
        self.input.clear();
        self.messages
            .push(ChatMessage::new(MessageRole::User, message.clone()));
        self.messages
            .push(ChatMessage::new(MessageRole::Assistant, String::new()));
        self.phase = Phase::Sending;
        self.generation += 1;
        CLIENT_TURNS.click();
        Some(Turn {
            generation: self.generation,
            message,
        })
    }

    /// Apply an update for `turn`.
    ///
    /// Returns false when the update was dropped because the turn is finished
    /// or the session was reset after it started.
    pub fn apply(&mut self, turn: &Turn, update: StreamUpdate) -> bool {
        if turn.generation != self.generation || !self.is_in_flight() {
            CLIENT_STALE_UPDATES.click();
            return false;
        }
        match update {
            StreamUpdate::Started => self.phase = Phase::Streaming,
            StreamUpdate::Fragment(text) => {
                self.phase = Phase::Streaming;
                if let Some(reply) = self.reply_mut() {
                    reply.push_str(&text);
                }
            }
            StreamUpdate::Completed | StreamUpdate::Interrupted => self.phase = Phase::Idle,
            StreamUpdate::Failed(text) => {
                CLIENT_TURN_FAILURES.click();
                if let Some(reply) = self.reply_mut() {
                    *reply = text;
                }
                self.phase = Phase::Idle;
            }
        }
        true
    }

    /// Discard the transcript and the pending input.
    ///
    /// Any turn still in flight becomes stale.
    pub fn new_chat(&mut self) {
        self.messages.clear();
        self.input.clear();
        self.phase = Phase::Idle;
        self.generation += 1;
    }

    fn reply_mut(&mut self) -> Option<&mut String> {
        self.messages
            .last_mut()
            .filter(|m| m.role == MessageRole::Assistant)
            .map(|m| &mut m.content)
    }
}
