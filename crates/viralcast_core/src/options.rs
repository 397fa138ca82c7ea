//! Per-call generation options.

use serde::{Deserialize, Serialize};

/// Optional knobs for a single text generation call.
///
/// Providers fall back to their own defaults for every unset field.
///
/// # Examples
///
/// ```
/// use viralcast_core::TextOptions;
///
/// let options = TextOptions::default()
///     .with_temperature(0.3)
///     .with_web_search(true);
///
/// assert_eq!(*options.temperature(), Some(0.3));
/// assert!(*options.web_search());
/// assert_eq!(*options.max_tokens(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct TextOptions {
    /// Model override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Ground the answer with web search where the provider supports it
    #[serde(default)]
    web_search: bool,
}

impl TextOptions {
    /// Sets the model override.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the maximum number of tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Enables or disables web search grounding.
    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }
}
