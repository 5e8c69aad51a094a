//! Command-line configuration for the chat client.

use arrrg_derive::CommandLine;

/// Where the client looks for the server by default.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000/";

/// Command-line arguments for the brandchat client.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Server base URL.
    #[arrrg(optional, "Server base URL (default: http://127.0.0.1:3000/)", "URL")]
    pub url: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Server base URL.
    pub url: String,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Defaults: the local server, colours on.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            use_color: true,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let defaults = ChatConfig::new();
        Self {
            url: args.url.unwrap_or(defaults.url),
            use_color: !args.no_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert_eq!(config.url, DEFAULT_SERVER_URL);
        assert!(config.use_color);
    }

    #[test]
    fn overrides() {
        let config = ChatConfig::from(ChatArgs {
            url: Some("http://chat.example.com/".to_string()),
            no_color: true,
        });
        assert_eq!(config.url, "http://chat.example.com/");
        assert!(!config.use_color);
    }
}
