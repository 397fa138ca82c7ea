//! Generation envelopes.

use serde::{Deserialize, Serialize};

/// Raw output of a single text provider call.
///
/// # Examples
///
/// ```
/// use viralcast_core::ProviderOutput;
///
/// let output = ProviderOutput::new("Hello!", "llama-3.1-8b-instant");
/// assert_eq!(output.model, "llama-3.1-8b-instant");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOutput {
    /// Generated text
    pub text: String,
    /// Model identifier as reported by the upstream
    pub model: String,
}

impl ProviderOutput {
    /// Creates a new provider output.
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
        }
    }

    /// Tags this output with the provider that produced it.
    pub fn with_provider(self, provider: impl Into<String>) -> GenerationResult {
        GenerationResult {
            text: self.text,
            model: self.model,
            provider: provider.into(),
        }
    }
}

/// Normalized envelope returned by the text router.
///
/// # Examples
///
/// ```
/// use viralcast_core::ProviderOutput;
///
/// let result = ProviderOutput::new("Hi", "deepseek-chat").with_provider("DeepSeek");
/// assert_eq!(result.provider, "DeepSeek");
/// assert_eq!(result.text, "Hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated text
    pub text: String,
    /// Model identifier as reported by the provider
    pub model: String,
    /// Name of the provider that ultimately succeeded
    pub provider: String,
}
