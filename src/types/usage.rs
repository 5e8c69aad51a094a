use serde::{Deserialize, Serialize};

/// Billing and rate-limit usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// The number of input tokens which were used.
    #[serde(default)]
    pub input_tokens: u64,

    /// The number of output tokens which were used.
    #[serde(default)]
    pub output_tokens: u64,
}

impl Usage {
    /// Create a new `Usage` with the given token counts.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}
