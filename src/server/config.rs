//! Server configuration.
//!
//! Everything the server needs is resolved once at startup into a
//! [`ServerConfig`] and passed to [`crate::server::AppState`]; nothing reads
//! the environment at request time.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use arrrg_derive::CommandLine;

use crate::brand::DEFAULT_EXTENSION;
use crate::client::DEFAULT_API_URL;
use crate::types::Model;
use crate::{Error, Result};

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default reply length cap, in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Command-line arguments for brandchat-server.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ServerArgs {
    /// Address to listen on.
    #[arrrg(optional, "Address to listen on (default: 127.0.0.1:3000)", "ADDR")]
    pub bind: Option<String>,

    /// Path of the branding document.
    #[arrrg(optional, "Branding config document (default: config.json)", "PATH")]
    pub config: Option<String>,

    /// Directory of brand guideline documents.
    #[arrrg(optional, "Brand guideline directory (default: content)", "DIR")]
    pub content: Option<String>,

    /// Extension of guideline documents.
    #[arrrg(optional, "Guideline document extension (default: md)", "EXT")]
    pub extension: Option<String>,

    /// Model to use.
    #[arrrg(optional, "Model to use (default: claude-sonnet-4-5-20250929)", "MODEL")]
    pub model: Option<String>,

    /// Maximum tokens per reply.
    #[arrrg(optional, "Max tokens per reply (default: 2048)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Provider base URL.
    #[arrrg(optional, "Provider API base URL", "URL")]
    pub base_url: Option<String>,
}

/// Resolved server configuration.
#[derive(Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: SocketAddr,
    /// Path of the branding document.
    pub config_path: PathBuf,
    /// Directory of brand guideline documents.
    pub content_dir: PathBuf,
    /// Extension of guideline documents, without the dot.
    pub content_extension: String,
    /// Model every request goes to.
    pub model: Model,
    /// Reply length cap.
    pub max_tokens: u32,
    /// Provider base URL.
    pub base_url: String,
    /// Provider credential.  `None` makes every chat request fail with a
    /// configuration error.
    pub api_key: Option<String>,
}

impl ServerConfig {
    /// Resolve arguments and an explicit credential into a configuration.
    pub fn from_args(args: ServerArgs, api_key: Option<String>) -> Result<Self> {
        let bind = args.bind.as_deref().unwrap_or(DEFAULT_BIND);
        let bind = bind.parse::<SocketAddr>().map_err(|e| {
            Error::validation(
                format!("invalid listen address {bind:?}: {e}"),
                Some("bind".to_string()),
            )
        })?;
        let max_tokens = args.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        if max_tokens == 0 {
            return Err(Error::validation(
                "max tokens must be positive",
                Some("max_tokens".to_string()),
            ));
        }
        let model = match args.model {
            Some(model) => {
                let Ok(model) = model.parse::<Model>();
                model
            }
            None => Model::default(),
        };
        Ok(Self {
            bind,
            config_path: PathBuf::from(args.config.unwrap_or_else(|| "config.json".to_string())),
            content_dir: PathBuf::from(args.content.unwrap_or_else(|| "content".to_string())),
            content_extension: args
                .extension
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            model,
            max_tokens,
            base_url: args.base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Resolve arguments, taking the credential from [`API_KEY_ENV`].
    pub fn from_env(args: ServerArgs) -> Result<Self> {
        Self::from_args(args, std::env::var(API_KEY_ENV).ok())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            config_path: PathBuf::from("config.json"),
            content_dir: PathBuf::from("content"),
            content_extension: DEFAULT_EXTENSION.to_string(),
            model: Model::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: DEFAULT_API_URL.to_string(),
            api_key: None,
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind", &self.bind)
            .field("config_path", &self.config_path)
            .field("content_dir", &self.content_dir)
            .field("content_extension", &self.content_extension)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
