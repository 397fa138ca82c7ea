//! Gemini text provider with a model cascade.

use super::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, GoogleSearch,
    ThinkingConfig, Tool,
};
use crate::ProviderMetrics;
use crate::http::{transport_error, unavailable, upstream_error};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use viralcast_core::{ProviderOutput, TextOptions};
use viralcast_error::{ProviderError, ProviderErrorKind, ViralcastError, ViralcastResult};
use viralcast_interface::TextProvider;
use viralcast_rate_limit::{ProviderConfig, is_usable_api_key};

/// Generative Language API root.
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Text models, most capable first.
pub const GEMINI_TEXT_MODELS: [&str; 3] = [
    "gemini-3-pro-preview",
    "gemini-3-flash-preview",
    "gemini-flash-lite-latest",
];

const PRO_THINKING_BUDGET: u32 = 4000;
const PROVIDER_NAME: &str = "Gemini";

/// Gemini text provider.
///
/// Each call walks the model list: a model that is rate limited, out of quota
/// or failing server-side hands the request to the next, cheaper model. Any
/// other failure ends the call immediately. Lite models never receive tools.
///
/// # Examples
///
/// ```
/// use viralcast_interface::TextProvider;
/// use viralcast_models::GeminiProvider;
///
/// let gemini = GeminiProvider::new("AIzaSy-0123456789");
/// assert_eq!(gemini.name(), "Gemini");
/// assert_eq!(gemini.models().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    models: Vec<String>,
}

impl GeminiProvider {
    /// Creates a provider with the default model cascade.
    pub fn new(api_key: impl Into<String>) -> Self {
        debug!("Creating Gemini provider");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GEMINI_API_URL.to_string(),
            models: GEMINI_TEXT_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Creates a provider from its configuration table.
    ///
    /// A configured `model` replaces the cascade with that single model.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let mut provider = Self::new(config.resolve_api_key().unwrap_or_default());
        if let Some(base_url) = config.resolve_base_url() {
            provider = provider.with_base_url(base_url);
        }
        if let Some(model) = &config.model {
            provider = provider.with_models(vec![model.clone()]);
        }
        provider
    }

    /// Overrides the API root (trailing slashes are ignored).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replaces the model cascade.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Model cascade, most capable first.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    fn build_request(
        model: &str,
        prompt: &str,
        system_instruction: Option<&str>,
        mut generation_config: GenerationConfig,
        web_search: bool,
    ) -> GenerateContentRequest {
        let lite = model.contains("lite");
        if model.contains("pro") {
            generation_config.thinking_config = Some(ThinkingConfig {
                thinking_budget: PRO_THINKING_BUDGET,
            });
        }

        let tools = if web_search && !lite {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: system_instruction.map(Content::system),
            generation_config,
            tools,
        }
    }

    /// Walks the cascade until a model answers.
    async fn call_with_cascade(
        &self,
        models: &[String],
        prompt: &str,
        system_instruction: Option<&str>,
        generation_config: GenerationConfig,
        web_search: bool,
    ) -> ViralcastResult<ProviderOutput> {
        let mut last_error: Option<ViralcastError> = None;

        for model in models {
            info!(model = %model, "Attempting Gemini model");
            let request = Self::build_request(
                model,
                prompt,
                system_instruction,
                generation_config.clone(),
                web_search,
            );

            let started = Instant::now();
            match self.call_model(model, &request).await {
                Ok(text) => {
                    ProviderMetrics::get().record_request(
                        PROVIDER_NAME,
                        model,
                        started.elapsed().as_secs_f64(),
                    );
                    return Ok(ProviderOutput::new(text, model.as_str()));
                }
                Err(e) => {
                    ProviderMetrics::get().record_error(PROVIDER_NAME, model, &e);
                    if !steps_down(&e) {
                        return Err(e);
                    }
                    warn!(model = %model, error = %e.detail(), "Gemini model failed, stepping down the ladder");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::upstream(PROVIDER_NAME, None, "No Gemini models configured").into()
        }))
    }

    async fn call_model(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> ViralcastResult<String> {
        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_NAME, e))?;

        if !response.status().is_success() {
            return Err(upstream_error(PROVIDER_NAME, response).await);
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Gemini response");
            ProviderError::upstream(PROVIDER_NAME, None, format!("Failed to parse response: {}", e))
        })?;

        body.text()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse(model.to_string())).into())
    }
}

/// Whether a failed model should hand over to the next one in the cascade.
fn steps_down(error: &ViralcastError) -> bool {
    if matches!(error.status_code(), Some(status) if status == 429 || status >= 500) {
        return true;
    }
    let detail = error.detail().to_lowercase();
    detail.contains("429") || detail.contains("exhausted")
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        is_usable_api_key(&self.api_key)
    }

    #[instrument(skip(self, prompt, system_instruction, options), fields(provider = PROVIDER_NAME, web_search = *options.web_search()))]
    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        options: &TextOptions,
    ) -> ViralcastResult<ProviderOutput> {
        if !self.is_available() {
            return Err(unavailable(PROVIDER_NAME));
        }

        let models = match options.model() {
            Some(model) => vec![model.clone()],
            None => self.models.clone(),
        };

        let generation_config = GenerationConfig {
            temperature: *options.temperature(),
            max_output_tokens: *options.max_tokens(),
            ..Default::default()
        };

        self.call_with_cascade(
            &models,
            prompt,
            system_instruction,
            generation_config,
            *options.web_search(),
        )
        .await
    }

    #[instrument(skip(self, prompt, schema, system_instruction), fields(provider = PROVIDER_NAME))]
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        system_instruction: Option<&str>,
    ) -> ViralcastResult<serde_json::Value> {
        if !self.is_available() {
            return Err(unavailable(PROVIDER_NAME));
        }

        let generation_config = GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema.clone()),
            ..Default::default()
        };

        let output = self
            .call_with_cascade(&self.models, prompt, system_instruction, generation_config, false)
            .await?;

        serde_json::from_str(&output.text).map_err(|e| {
            error!(error = %e, model = %output.model, "Gemini returned invalid structured output");
            ProviderError::new(ProviderErrorKind::MalformedStructuredOutput { raw: output.text }).into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viralcast_error::HttpError;

    #[test]
    fn test_step_down_classification() {
        let quota: ViralcastError = ProviderError::upstream("Gemini", Some(429), "slow down").into();
        let server: ViralcastError = ProviderError::upstream("Gemini", Some(503), "overloaded").into();
        let exhausted: ViralcastError =
            ProviderError::upstream("Gemini", Some(400), "Resource has been exhausted").into();
        let bad_request: ViralcastError =
            ProviderError::upstream("Gemini", Some(400), "Invalid argument").into();
        let network: ViralcastError = HttpError::new("connection reset").into();

        assert!(steps_down(&quota));
        assert!(steps_down(&server));
        assert!(steps_down(&exhausted));
        assert!(!steps_down(&bad_request));
        assert!(!steps_down(&network));
    }

    #[test]
    fn test_lite_models_drop_tools() {
        let lite = GeminiProvider::build_request(
            "gemini-flash-lite-latest",
            "hi",
            None,
            GenerationConfig::default(),
            true,
        );
        assert!(lite.tools.is_empty());
        assert!(lite.generation_config.thinking_config.is_none());

        let pro = GeminiProvider::build_request(
            "gemini-3-pro-preview",
            "hi",
            Some("system"),
            GenerationConfig::default(),
            true,
        );
        assert_eq!(pro.tools.len(), 1);
        assert_eq!(
            pro.generation_config.thinking_config,
            Some(ThinkingConfig {
                thinking_budget: PRO_THINKING_BUDGET
            })
        );
        assert!(pro.system_instruction.is_some());
    }
}
