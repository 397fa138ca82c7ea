//! Gemini image provider.

use super::NicheStyles;
use crate::ProviderMetrics;
use crate::gemini::{
    Content, GEMINI_API_URL, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImageConfig,
};
use crate::http::{transport_error, unavailable, upstream_error};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, instrument};
use viralcast_core::ImageReference;
use viralcast_error::{ProviderError, ProviderErrorKind, ViralcastResult};
use viralcast_interface::ImageProvider;
use viralcast_rate_limit::{ProviderConfig, is_usable_api_key};

const PROVIDER_NAME: &str = "Gemini Image";
const MODEL: &str = "gemini-2.5-flash-image";

const STYLES: NicheStyles = NicheStyles {
    design: "High-end cinematic visuals for design brand style",
    movies: "Cinematic movie poster style, dramatic composition",
    news: "Professional journalism photography, clean and clear",
    generic: "High-end professional visuals",
};

/// Gemini native image generation (`gemini-2.5-flash-image`, square output).
#[derive(Debug, Clone)]
pub struct GeminiImageProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiImageProvider {
    /// Creates a provider against the public Generative Language API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    /// Creates a provider from its configuration table.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let provider = Self::new(config.resolve_api_key().unwrap_or_default());
        match config.resolve_base_url() {
            Some(base_url) => provider.with_base_url(base_url),
            None => provider,
        }
    }

    /// Overrides the API root (trailing slashes are ignored).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Prompt with the niche style prefix and quality suffix applied.
    pub fn enhance_prompt(prompt: &str, niche: &str) -> String {
        format!(
            "{}. {}. Professional studio lighting, photorealistic, 8k, high quality.",
            STYLES.pick(niche),
            prompt
        )
    }

    async fn request_image(&self, prompt: &str, niche: &str) -> ViralcastResult<ImageReference> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(Self::enhance_prompt(prompt, niche))],
            generation_config: GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: "1:1".to_string(),
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, MODEL))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_NAME, e))?;

        if !response.status().is_success() {
            return Err(upstream_error(PROVIDER_NAME, response).await);
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            ProviderError::upstream(PROVIDER_NAME, None, format!("Failed to parse response: {}", e))
        })?;

        let inline = body.first_inline_data().ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::EmptyResponse(PROVIDER_NAME.to_string()))
        })?;

        let data = STANDARD.decode(inline.data()).map_err(|e| {
            ProviderError::upstream(PROVIDER_NAME, None, format!("Invalid image data: {}", e))
        })?;
        debug!(mime = %inline.mime_type(), bytes = data.len(), "Received inline image");

        Ok(ImageReference::inline(inline.mime_type().as_str(), data))
    }
}

#[async_trait]
impl ImageProvider for GeminiImageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        is_usable_api_key(&self.api_key)
    }

    #[instrument(skip(self, prompt, _style), fields(provider = PROVIDER_NAME))]
    async fn generate_image(
        &self,
        prompt: &str,
        niche: &str,
        _style: Option<&str>,
    ) -> ViralcastResult<ImageReference> {
        if !self.is_available() {
            return Err(unavailable(PROVIDER_NAME));
        }

        let started = Instant::now();
        let result = self.request_image(prompt, niche).await;
        let metrics = ProviderMetrics::get();
        match &result {
            Ok(_) => metrics.record_request(PROVIDER_NAME, MODEL, started.elapsed().as_secs_f64()),
            Err(e) => metrics.record_error(PROVIDER_NAME, MODEL, e),
        }
        result
    }
}
