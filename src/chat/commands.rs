//! Slash command parsing for the chat client.
//!
//! Commands control the local session and are never sent to the server.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Start a new conversation.
    New,

    /// Display help information.
    Help,

    /// Exit the chat client.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent as a message.
///
/// # Examples
///
/// ```
/// # use brandchat::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/new"), Some(ChatCommand::New));
/// assert!(parse_command("What is our tone?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;
    let command = rest.split_whitespace().next().unwrap_or("").to_lowercase();

    let result = match command.as_str() {
        "new" | "clear" | "reset" => ChatCommand::New,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{command}")),
    };
    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new      Start a new conversation
  /help     Show this help message
  /quit     Exit the chat
Press Ctrl+C while a reply is streaming to stop it."#
}
