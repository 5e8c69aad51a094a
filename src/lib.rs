// Public modules
pub mod brand;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod prompt;
pub mod provider;
pub mod server;
pub mod sse;
pub mod types;
pub mod wire;

// Re-exports
pub use client::Anthropic;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use provider::{MessageStream, ModelProvider};
pub use types::*;
