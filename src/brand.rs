//! Brand guideline documents.
//!
//! Every document with the configured extension in the content directory is
//! read, headed with its file name, and joined into one block of guidance
//! text for the system prompt.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::Result;
use crate::observability::{BRAND_CONTENT_FAILURES, BRAND_CONTENT_LOADS};

/// Separator placed between documents.
pub const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Returned (and cached) when the directory holds no guideline documents.
pub const NO_GUIDELINES_MESSAGE: &str = "No brand guidelines have been configured yet. Please add markdown files to the /content directory.";

/// Returned (never cached) when the directory cannot be read.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading brand guidelines. Please ensure the /content directory exists and contains markdown files.";

/// Default guideline document extension.
pub const DEFAULT_EXTENSION: &str = "md";

/// Read and join the guideline documents in `dir`.
///
/// Documents are ordered by file name so the composed prompt is the same on
/// every platform.  Returns `Ok(None)` when no document qualifies.
pub fn load_brand_content(dir: &Path, extension: &str) -> Result<Option<String>> {
    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        files.push((name.to_string(), path));
    }
    if files.is_empty() {
        return Ok(None);
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut sections = Vec::with_capacity(files.len());
    for (name, path) in files {
        // Documents in a legacy encoding still contribute; bad bytes become U+FFFD.
        let bytes = std::fs::read(&path)?;
        let text = String::from_utf8_lossy(&bytes);
        sections.push(format!("# {name}\n\n{text}"));
    }
    Ok(Some(sections.join(DOCUMENT_SEPARATOR)))
}

/// Lazily loads and caches the joined guideline text.
///
/// Successful loads (including "nothing configured") are cached for the
/// process.  I/O failures return [`LOAD_ERROR_MESSAGE`] and are retried on
/// the next call.
#[derive(Debug)]
pub struct BrandContentProvider {
    dir: PathBuf,
    extension: String,
    cached: OnceLock<Arc<str>>,
}

impl BrandContentProvider {
    /// Create a provider for markdown documents in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_extension(dir, DEFAULT_EXTENSION)
    }

    /// Create a provider for documents with a custom extension (no dot).
    pub fn with_extension(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
            cached: OnceLock::new(),
        }
    }

    /// The content directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Return the joined guideline text, reading the directory on first use.
    pub fn get(&self) -> Arc<str> {
        if let Some(content) = self.cached.get() {
            return Arc::clone(content);
        }
        match load_brand_content(&self.dir, &self.extension) {
            Ok(Some(content)) => {
                BRAND_CONTENT_LOADS.click();
                tracing::info!(dir = %self.dir.display(), bytes = content.len(), "loaded brand guidelines");
                Arc::clone(self.cached.get_or_init(|| Arc::from(content)))
            }
            Ok(None) => {
                tracing::warn!(dir = %self.dir.display(), extension = %self.extension, "no brand guidelines found");
                Arc::clone(self.cached.get_or_init(|| Arc::from(NO_GUIDELINES_MESSAGE)))
            }
            Err(err) => {
                BRAND_CONTENT_FAILURES.click();
                tracing::warn!(dir = %self.dir.display(), error = %err, "failed to load brand guidelines");
                Arc::from(LOAD_ERROR_MESSAGE)
            }
        }
    }

    /// Whether a result has been cached.
    pub fn is_cached(&self) -> bool {
        self.cached.get().is_some()
    }
}
