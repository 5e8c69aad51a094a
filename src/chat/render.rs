//! Terminal output for the chat client.

use std::io::{self, Write};

use crate::config::AppConfig;

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering chat output.
///
/// Streaming calls arrive in order: `start_response`, any number of
/// `print_text`, then exactly one of `finish_response`, `print_error` or
/// `print_interrupted`.
pub trait Renderer: Send {
    /// Called before the first fragment of a reply.
    fn start_response(&mut self);

    /// Print a chunk of reply text as it streams in.
    fn print_text(&mut self, text: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Called when a reply is complete.
    fn finish_response(&mut self);

    /// Called when the user interrupts a reply.
    fn print_interrupted(&mut self);
}

/// Parse `#rrggbb` or `#rgb` into its channels.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let r = channel(&hex[0..1])?;
            let g = channel(&hex[1..2])?;
            let b = channel(&hex[2..3])?;
            Some((r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

fn foreground(rgb: (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{};{};{}m", rgb.0, rgb.1, rgb.2)
}

/// The greeting shown when the client starts.
pub fn banner(config: &AppConfig, use_color: bool) -> String {
    let accent = parse_hex_color(&config.primary_color)
        .filter(|_| use_color)
        .map(foreground);
    let mut out = String::new();
    match &accent {
        Some(accent) => out.push_str(&format!(
            "{ANSI_BOLD}{accent}{}{ANSI_RESET}\n",
            config.company_name
        )),
        None => out.push_str(&format!("{}\n", config.company_name)),
    }
    if !config.tagline.is_empty() {
        if use_color {
            out.push_str(&format!("{ANSI_DIM}{}{ANSI_RESET}\n", config.tagline));
        } else {
            out.push_str(&format!("{}\n", config.tagline));
        }
    }
    out.push('\n');
    if !config.welcome_message.is_empty() {
        out.push_str(&format!("{}\n", config.welcome_message));
    }
    if !config.suggestions.is_empty() {
        out.push_str("\nTry asking:\n");
        for suggestion in &config.suggestions {
            out.push_str(&format!("  {} {}", suggestion.icon, suggestion.text));
            if !suggestion.description.is_empty() {
                out.push_str(&format!(" ({})", suggestion.description));
            }
            out.push('\n');
        }
    }
    out
}

/// Shown after the reply label until the first fragment, error or interrupt.
pub const THINKING_INDICATOR: &str = "\u{2026}";

/// Erases the one-column [`THINKING_INDICATOR`].
const ERASE_INDICATOR: &str = "\x08 \x08";

/// Plain text renderer with optional ANSI styling.
///
/// The reply label is drawn in the brand's primary colour when one parses.
pub struct PlainTextRenderer {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    use_color: bool,
    label: String,
    accent: Option<String>,
    started: bool,
    thinking: bool,
}

impl PlainTextRenderer {
    /// Creates a renderer with ANSI colours enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a renderer with the specified colour setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writers(use_color, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    fn with_writers(use_color: bool, out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            err,
            use_color,
            label: "Assistant".to_string(),
            accent: None,
            started: false,
            thinking: false,
        }
    }

    /// Label replies with the company name in its primary colour.
    pub fn with_branding(mut self, config: &AppConfig) -> Self {
        self.label = config.company_name.clone();
        self.accent = parse_hex_color(&config.primary_color)
            .filter(|_| self.use_color)
            .map(foreground);
        self
    }

    fn write(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }

    fn clear_thinking(&mut self) {
        if self.thinking {
            self.thinking = false;
            self.write(ERASE_INDICATOR);
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn start_response(&mut self) {
        let label = match &self.accent {
            Some(accent) => format!("{ANSI_BOLD}{accent}{}:{ANSI_RESET} ", self.label),
            None => format!("{}: ", self.label),
        };
        self.write(&label);
        let indicator = if self.use_color {
            format!("{ANSI_DIM}{THINKING_INDICATOR}{ANSI_RESET}")
        } else {
            THINKING_INDICATOR.to_string()
        };
        self.write(&indicator);
        self.started = true;
        self.thinking = true;
    }

    fn print_text(&mut self, text: &str) {
        self.clear_thinking();
        self.write(text);
    }

    fn print_error(&mut self, error: &str) {
        self.clear_thinking();
        if self.started {
            self.write("\n");
            self.started = false;
        }
        let line = if self.use_color {
            format!("{ANSI_RED}Error: {error}{ANSI_RESET}\n")
        } else {
            format!("Error: {error}\n")
        };
        let _ = self.err.write_all(line.as_bytes());
        let _ = self.err.flush();
    }

    fn print_info(&mut self, info: &str) {
        self.write(&format!("{info}\n"));
    }

    fn finish_response(&mut self) {
        self.clear_thinking();
        self.started = false;
        self.write("\n\n");
    }

    fn print_interrupted(&mut self) {
        self.clear_thinking();
        self.started = false;
        self.write("\n[interrupted]\n\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Suggestion;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured() -> (PlainTextRenderer, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let renderer =
            PlainTextRenderer::with_writers(false, Box::new(out.clone()), Box::new(err.clone()));
        (renderer, out, err)
    }

    #[test]
    fn thinking_indicator_cleared_by_first_fragment() {
        let (mut renderer, out, _) = captured();
        renderer.start_response();
        assert_eq!(out.contents(), "Assistant: \u{2026}");
        renderer.print_text("Hi");
        renderer.print_text(" there");
        renderer.finish_response();
        assert_eq!(
            out.contents(),
            "Assistant: \u{2026}\x08 \x08Hi there\n\n"
        );
    }

    #[test]
    fn thinking_indicator_cleared_by_error() {
        let (mut renderer, out, err) = captured();
        renderer.start_response();
        renderer.print_error("Failed to get response");
        assert_eq!(out.contents(), "Assistant: \u{2026}\x08 \x08\n");
        assert_eq!(err.contents(), "Error: Failed to get response\n");
    }

    #[test]
    fn thinking_indicator_cleared_by_interrupt() {
        let (mut renderer, out, _) = captured();
        renderer.start_response();
        renderer.print_interrupted();
        assert_eq!(
            out.contents(),
            "Assistant: \u{2026}\x08 \x08\n[interrupted]\n\n"
        );
    }

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color_ignores_accent() {
        let renderer = PlainTextRenderer::with_color(false).with_branding(&AppConfig::fallback());
        assert!(renderer.accent.is_none());
        assert_eq!(renderer.label, "Your Company");
    }

    #[test]
    fn renderer_with_branding_uses_primary_color() {
        let renderer = PlainTextRenderer::new().with_branding(&AppConfig::fallback());
        assert_eq!(renderer.accent.as_deref(), Some("\x1b[38;2;0;112;243m"));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#0070f3"), Some((0, 112, 243)));
        assert_eq!(parse_hex_color(" #FFFFFF "), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("#abc"), Some((0xaa, 0xbb, 0xcc)));
        assert_eq!(parse_hex_color("0070f3"), None);
        assert_eq!(parse_hex_color("#0070f"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn plain_banner() {
        let config = AppConfig {
            company_name: "Acme".to_string(),
            primary_color: "#112233".to_string(),
            tagline: "Rockets".to_string(),
            welcome_message: "Hi there".to_string(),
            suggestions: vec![Suggestion {
                icon: "*".to_string(),
                text: "Write a tagline".to_string(),
                description: "short".to_string(),
            }],
        };
        assert_eq!(
            banner(&config, false),
            "Acme\nRockets\n\nHi there\n\nTry asking:\n  * Write a tagline (short)\n"
        );
    }

    #[test]
    fn colored_banner_uses_primary_color() {
        let banner = banner(&AppConfig::fallback(), true);
        assert!(banner.starts_with("\x1b[1m\x1b[38;2;0;112;243mYour Company\x1b[0m\n"));
    }

    #[test]
    fn banner_with_unparseable_color_is_plain() {
        let config = AppConfig {
            primary_color: "blue".to_string(),
            ..AppConfig::fallback()
        };
        assert!(banner(&config, true).starts_with("Your Company\n"));
    }
}
