//! Interactive terminal client for a brandchat server.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a local server
//! brandchat
//!
//! # Talk to a server elsewhere, without colours
//! brandchat --url http://chat.example.com/ --no-color
//! ```
//!
//! # Commands
//!
//! - `/new` - Start a new conversation
//! - `/help` - Show available commands
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use brandchat::chat::{
    ChatArgs, ChatClient, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer,
    banner, help_text, parse_command, run_turn,
};
use brandchat::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("brandchat [OPTIONS]");
    let config = ChatConfig::from(args);

    let client = ChatClient::new(&config.url)?;
    let branding = match client.fetch_config().await {
        Ok(branding) => branding,
        Err(err) => {
            tracing::warn!(error = %err, "could not load branding; using defaults");
            AppConfig::fallback()
        }
    };

    let mut session = ChatSession::new();
    let mut renderer = PlainTextRenderer::with_color(config.use_color).with_branding(&branding);
    let mut rl = DefaultEditor::new()?;

    // Set while a reply is streaming and the user presses Ctrl+C.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    print!("{}", banner(&branding, config.use_color));
    println!("Type /help for commands, /quit to exit\n");

    loop {
        interrupted.store(false, Ordering::Relaxed);

        match rl.readline("You: ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.trim());

                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::New => {
                            session.new_chat();
                            renderer.print_info("Started a new conversation.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {line}");
                            }
                        }
                        ChatCommand::Invalid(message) => renderer.print_error(&message),
                    }
                    continue;
                }

                session.set_input(line);
                let Some(turn) = session.submit() else {
                    continue;
                };
                // Failures are already rendered and recorded in the session.
                let _ = run_turn(&client, &mut session, turn, &mut renderer, &interrupted).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {err}"));
                break;
            }
        }
    }

    Ok(())
}
