//! HTTP server for the brand chat assistant.
//!
//! # Usage
//!
//! ```bash
//! export ANTHROPIC_API_KEY=...
//! brandchat-server --config config.json --content content/
//! ```
//!
//! Routes:
//! - `POST /chat` streams a reply to `{"message": "..."}`
//! - `GET /config` returns the branding document
//! - `GET /health` reports liveness

use arrrg::CommandLine;

use brandchat::server::{ServerArgs, ServerConfig, serve};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,brandchat=debug".to_string()),
        )
        .init();

    let (args, free) = ServerArgs::from_command_line_relaxed("brandchat-server [OPTIONS]");
    if !free.is_empty() {
        eprintln!("brandchat-server takes no positional arguments");
        std::process::exit(1);
    }
    let config = ServerConfig::from_env(args)?;
    tracing::debug!(?config, "resolved configuration");
    serve(config).await?;
    Ok(())
}
