//! Branding configuration.
//!
//! The UI's company name, colour, tagline and suggestion chips come from one
//! JSON document.  [`ConfigProvider`] reads it lazily, keeps the first
//! successful parse for the rest of the process, and answers with
//! [`AppConfig::fallback`] whenever the document cannot be read.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::observability::{CONFIG_CACHE_HITS, CONFIG_FALLBACKS};

/// One suggestion chip shown on the welcome screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Emoji icon.
    pub icon: String,
    /// Short use-case name.
    pub text: String,
    /// Brief description.
    pub description: String,
}

impl Suggestion {
    fn new(icon: &str, text: &str, description: &str) -> Self {
        Self {
            icon: icon.to_string(),
            text: text.to_string(),
            description: description.to_string(),
        }
    }
}

/// UI branding for the assistant.
///
/// Field names are camelCase on the wire so the same document serves the
/// server and the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Company name displayed in the header and used in the system prompt.
    pub company_name: String,
    /// Primary brand colour in hex, e.g. `#FF6B35`.
    pub primary_color: String,
    /// Tagline shown below the company name.
    pub tagline: String,
    /// Welcome text for the empty session.
    pub welcome_message: String,
    /// Use-case suggestions shown on the welcome screen.
    pub suggestions: Vec<Suggestion>,
}

impl AppConfig {
    /// The branding used when no usable document exists.
    pub fn fallback() -> Self {
        Self {
            company_name: "Your Company".to_string(),
            primary_color: "#0070f3".to_string(),
            tagline: "Get help creating brand-consistent content".to_string(),
            welcome_message:
                "I'm here to help you create content that aligns with your brand guidelines."
                    .to_string(),
            suggestions: vec![
                Suggestion::new("\u{2709}\u{fe0f}", "Customer emails", "Professional and warm"),
                Suggestion::new("\u{1f4e2}", "Product announcements", "Clear and exciting"),
                Suggestion::new("\u{2728}", "Marketing copy", "Persuasive and on-brand"),
            ],
        }
    }

    /// Read and parse a configuration document.
    ///
    /// The schema is not validated beyond what deserialization requires.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Lazily loads and caches the branding document.
///
/// Only a successful load is cached.  Two racing first calls may both read
/// the file; whichever stores first wins and both values are identical.
#[derive(Debug)]
pub struct ConfigProvider {
    path: PathBuf,
    cached: OnceLock<Arc<AppConfig>>,
}

impl ConfigProvider {
    /// Create a provider for the document at `path`.  Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: OnceLock::new(),
        }
    }

    /// The path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the branding, reading the document on first use.
    pub fn get(&self) -> Arc<AppConfig> {
        if let Some(config) = self.cached.get() {
            CONFIG_CACHE_HITS.click();
            return Arc::clone(config);
        }
        match AppConfig::load(&self.path) {
            Ok(config) => {
                tracing::info!(path = %self.path.display(), company = %config.company_name, "loaded branding config");
                Arc::clone(self.cached.get_or_init(|| Arc::new(config)))
            }
            Err(err) => {
                CONFIG_FALLBACKS.click();
                tracing::warn!(path = %self.path.display(), error = %err, "using fallback branding config");
                Arc::new(AppConfig::fallback())
            }
        }
    }

    /// Whether a document has been loaded and cached.
    pub fn is_cached(&self) -> bool {
        self.cached.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    const ACME: &str = r##"{"companyName":"Acme","primaryColor":"#112233","tagline":"t","welcomeMessage":"w","suggestions":[]}"##;

    #[test]
    fn valid_document_is_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, ACME).unwrap();

        let provider = ConfigProvider::new(&path);
        let config = provider.get();
        assert_eq!(config.company_name, "Acme");
        assert_eq!(config.primary_color, "#112233");
        assert_eq!(config.tagline, "t");
        assert_eq!(config.welcome_message, "w");
        assert!(config.suggestions.is_empty());
        assert_eq!(
            serde_json::to_value(&*config).unwrap(),
            serde_json::from_str::<serde_json::Value>(ACME).unwrap()
        );
    }

    #[test]
    fn missing_document_yields_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ConfigProvider::new(dir.path().join("config.json"));
        let config = provider.get();
        assert_eq!(*config, AppConfig::fallback());
        assert_eq!(config.company_name, "Your Company");
        assert_eq!(config.primary_color, "#0070f3");
        assert!(!provider.is_cached());
    }

    #[test]
    fn corrupt_document_yields_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let provider = ConfigProvider::new(&path);
        assert_eq!(*provider.get(), AppConfig::fallback());
    }

    #[test]
    fn fallback_is_not_cached_so_recovery_is_automatic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let provider = ConfigProvider::new(&path);
        assert_eq!(provider.get().company_name, "Your Company");

        fs::write(&path, ACME).unwrap();
        assert_eq!(provider.get().company_name, "Acme");
        assert!(provider.is_cached());
    }

    #[test]
    fn success_is_cached_for_the_process() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, ACME).unwrap();
        let provider = ConfigProvider::new(&path);
        let first = provider.get();

        fs::write(&path, ACME.replace("Acme", "Globex")).unwrap();
        let second = provider.get();
        assert_eq!(second.company_name, "Acme");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn fallback_serializes_camel_case() {
        let value = serde_json::to_value(AppConfig::fallback()).unwrap();
        assert_eq!(value["companyName"], json!("Your Company"));
        assert_eq!(value["primaryColor"], json!("#0070f3"));
        assert_eq!(value["suggestions"].as_array().unwrap().len(), 3);
        assert_eq!(value["suggestions"][1]["text"], json!("Product announcements"));
    }
}
