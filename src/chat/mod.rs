//! Terminal chat client for a brandchat server.
//!
//! The pieces:
//!
//! - [`session`]: the transcript and its request state machine
//! - [`client`]: HTTP calls and the per-turn stream driver
//! - [`render`]: terminal output
//! - [`commands`]: slash command parsing
//! - [`config`]: command-line arguments

mod client;
mod commands;
mod config;
mod render;
mod session;

pub use client::{
    ChatClient, FAILED_RESPONSE_MESSAGE, GENERIC_FAILURE_MESSAGE, failure_text, run_turn,
};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_SERVER_URL};
pub use render::{PlainTextRenderer, Renderer, banner, parse_hex_color};
pub use session::{ChatMessage, ChatSession, Phase, StreamUpdate, Turn};
