use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Represents an Anthropic model identifier.
///
/// This can be a predefined model version or a custom string value
/// for models that may be added in the future.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for future models or private models)
    Custom(String),
}

/// Known Anthropic model versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownModel {
    /// Claude Sonnet 4.5 (alias)
    ClaudeSonnet45,

    /// Claude Sonnet 4.5 (2025-09-29 version)
    ClaudeSonnet4520250929,

    /// Claude Haiku 4.5 (alias)
    ClaudeHaiku45,

    /// Claude Opus 4.1 (alias)
    ClaudeOpus41,

    /// Claude Sonnet 4 (alias)
    ClaudeSonnet40,
}

impl KnownModel {
    /// The identifier the API expects for this model.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownModel::ClaudeSonnet45 => "claude-sonnet-4-5",
            KnownModel::ClaudeSonnet4520250929 => "claude-sonnet-4-5-20250929",
            KnownModel::ClaudeHaiku45 => "claude-haiku-4-5",
            KnownModel::ClaudeOpus41 => "claude-opus-4-1",
            KnownModel::ClaudeSonnet40 => "claude-sonnet-4-0",
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::ClaudeSonnet4520250929)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{known_model}"),
            Model::Custom(custom) => write!(f, "{custom}"),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    /// Parses a model name.  Unrecognized names become [`Model::Custom`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let known = match s {
            "claude-sonnet-4-5" => KnownModel::ClaudeSonnet45,
            "claude-sonnet-4-5-20250929" => KnownModel::ClaudeSonnet4520250929,
            "claude-haiku-4-5" => KnownModel::ClaudeHaiku45,
            "claude-opus-4-1" => KnownModel::ClaudeOpus41,
            "claude-sonnet-4-0" => KnownModel::ClaudeSonnet40,
            _ => return Ok(Model::Custom(s.to_string())),
        };
        Ok(Model::Known(known))
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}
