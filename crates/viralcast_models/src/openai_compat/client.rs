//! Provider for OpenAI-compatible chat completions APIs.

use super::{ChatMessage, ChatRequest, ChatResponse};
use crate::http::{transport_error, unavailable, upstream_error};
use crate::{ProviderMetrics, extract_json_object};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, error, instrument};
use viralcast_core::{ProviderOutput, TextOptions};
use viralcast_error::{ProviderError, ProviderErrorKind, ViralcastResult};
use viralcast_interface::TextProvider;
use viralcast_rate_limit::{ProviderConfig, is_usable_api_key};

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2000;
const JSON_TEMPERATURE: f32 = 0.3;

/// The OpenAI-compatible upstreams Viralcast knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum OpenAiFlavor {
    /// api.openai.com (or any endpoint set through `OPENAI_BASE_URL`)
    OpenAi,
    /// api.deepseek.com
    DeepSeek,
    /// api.groq.com
    Groq,
}

impl OpenAiFlavor {
    /// Provider name used for routing and blocklisting.
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::DeepSeek => "DeepSeek",
            Self::Groq => "Groq",
        }
    }

    /// Key of this flavor's `[providers.*]` configuration table.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::DeepSeek => "deepseek",
            Self::Groq => "groq",
        }
    }

    /// Base URL the `/chat/completions` path is appended to.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::DeepSeek => "https://api.deepseek.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
        }
    }

    /// Model used when neither configuration nor call options pick one.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-3.5-turbo",
            Self::DeepSeek => "deepseek-chat",
            Self::Groq => "llama-3.1-8b-instant",
        }
    }
}

/// Text provider speaking the OpenAI chat completions protocol.
///
/// One implementation serves OpenAI, DeepSeek and Groq; they differ only in
/// name, endpoint and default model.
///
/// # Examples
///
/// ```
/// use viralcast_interface::TextProvider;
/// use viralcast_models::OpenAiCompatibleProvider;
///
/// let groq = OpenAiCompatibleProvider::groq("gsk_0123456789abcdef");
/// assert_eq!(groq.name(), "Groq");
/// assert!(groq.is_available());
///
/// let unconfigured = OpenAiCompatibleProvider::deepseek("");
/// assert!(!unconfigured.is_available());
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleProvider {
    client: Client,
    flavor: OpenAiFlavor,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    /// Creates a provider for `flavor` with its default endpoint and model.
    pub fn new(flavor: OpenAiFlavor, api_key: impl Into<String>) -> Self {
        debug!(provider = flavor.name(), "Creating OpenAI-compatible provider");
        Self {
            client: Client::new(),
            flavor,
            api_key: api_key.into(),
            base_url: flavor.default_base_url().to_string(),
            model: flavor.default_model().to_string(),
        }
    }

    /// OpenAI provider.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new(OpenAiFlavor::OpenAi, api_key)
    }

    /// DeepSeek provider.
    pub fn deepseek(api_key: impl Into<String>) -> Self {
        Self::new(OpenAiFlavor::DeepSeek, api_key)
    }

    /// Groq provider.
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::new(OpenAiFlavor::Groq, api_key)
    }

    /// Creates a provider from its configuration table.
    ///
    /// A missing key yields a provider that reports itself unavailable.
    pub fn from_config(flavor: OpenAiFlavor, config: &ProviderConfig) -> Self {
        let mut provider = Self::new(flavor, config.resolve_api_key().unwrap_or_default());
        if let Some(base_url) = config.resolve_base_url() {
            provider = provider.with_base_url(base_url);
        }
        if let Some(model) = &config.model {
            provider = provider.with_model(model.clone());
        }
        provider
    }

    /// Overrides the endpoint (trailing slashes are ignored).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Which upstream this provider talks to.
    pub fn flavor(&self) -> OpenAiFlavor {
        self.flavor
    }

    /// Default model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        options: &TextOptions,
    ) -> ViralcastResult<ChatRequest> {
        let build_error = |e: String| {
            ProviderError::upstream(self.name(), None, format!("Failed to build request: {}", e))
        };

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_instruction {
            messages.push(
                ChatMessage::builder()
                    .role("system")
                    .content(system)
                    .build()
                    .map_err(|e| build_error(e.to_string()))?,
            );
        }
        messages.push(
            ChatMessage::builder()
                .role("user")
                .content(prompt)
                .build()
                .map_err(|e| build_error(e.to_string()))?,
        );

        Ok(ChatRequest::builder()
            .model(options.model().clone().unwrap_or_else(|| self.model.clone()))
            .messages(messages)
            .temperature((*options.temperature()).unwrap_or(DEFAULT_TEMPERATURE))
            .max_tokens((*options.max_tokens()).unwrap_or(DEFAULT_MAX_TOKENS))
            .build()
            .map_err(|e| build_error(e.to_string()))?)
    }
}

#[async_trait]
impl TextProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        self.flavor.name()
    }

    fn is_available(&self) -> bool {
        is_usable_api_key(&self.api_key)
    }

    #[instrument(skip(self, prompt, system_instruction, options), fields(provider = self.flavor.name(), model = tracing::field::Empty))]
    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        options: &TextOptions,
    ) -> ViralcastResult<ProviderOutput> {
        if !self.is_available() {
            return Err(unavailable(self.name()));
        }

        let request = self.build_request(prompt, system_instruction, options)?;
        tracing::Span::current().record("model", request.model().as_str());
        debug!(prompt_len = prompt.len(), "Sending chat completions request");

        let metrics = ProviderMetrics::get();
        let started = Instant::now();
        let result = self.send(&request).await;
        match &result {
            Ok(output) => {
                metrics.record_request(self.name(), &output.model, started.elapsed().as_secs_f64())
            }
            Err(e) => metrics.record_error(self.name(), request.model(), e),
        }
        result
    }

    #[instrument(skip(self, prompt, schema, system_instruction), fields(provider = self.flavor.name()))]
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        system_instruction: Option<&str>,
    ) -> ViralcastResult<serde_json::Value> {
        let schema_text = serde_json::to_string_pretty(schema)
            .map_err(|e| viralcast_error::JsonError::new(e.to_string()))?;
        let enhanced_prompt = format!(
            "{}\n\nReturn the response strictly as JSON matching this schema: {}",
            prompt, schema_text
        );

        let options = TextOptions::default().with_temperature(JSON_TEMPERATURE);
        let output = self
            .generate_text(&enhanced_prompt, system_instruction, &options)
            .await?;

        extract_json_object(&output.text).inspect_err(|_| {
            error!(response_length = output.text.len(), "Failed to parse JSON from provider response");
        })
    }
}

impl OpenAiCompatibleProvider {
    async fn send(&self, request: &ChatRequest) -> ViralcastResult<ProviderOutput> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(self.name(), e))?;

        if !response.status().is_success() {
            return Err(upstream_error(self.name(), response).await);
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse chat completions response");
            ProviderError::upstream(self.name(), None, format!("Failed to parse response: {}", e))
        })?;

        let text = body
            .first_text()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse(self.name().to_string())))?;
        let model = body.model().clone().unwrap_or_else(|| request.model().clone());

        debug!(model = %model, response_len = text.len(), "Received chat completion");
        Ok(ProviderOutput::new(text, model))
    }
}
