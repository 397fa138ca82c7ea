//! Stable Diffusion image providers on the Hugging Face Inference API.

use super::NicheStyles;
use crate::ProviderMetrics;
use crate::http::{error_message, transport_error, unavailable};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use viralcast_core::ImageReference;
use viralcast_error::{ProviderError, ViralcastError, ViralcastResult};
use viralcast_interface::ImageProvider;
use viralcast_rate_limit::{ProviderConfig, is_usable_api_key};

/// Public SDXL endpoint on the Hugging Face Inference API.
pub const SDXL_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0";

const MODEL: &str = "stable-diffusion-xl-base-1.0";
const KEYED_NAME: &str = "Stable Diffusion";
const FREE_NAME: &str = "Stable Diffusion Free";

#[derive(Debug, Serialize)]
struct Parameters {
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_inference_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    guidance_scale: Option<f32>,
}

#[derive(Debug, Serialize)]
struct TextToImageRequest {
    inputs: String,
    parameters: Parameters,
}

/// Posts a text-to-image request and reads back the image bytes.
///
/// A 503 means the model is still loading on the inference host.
async fn text_to_image(
    client: &Client,
    provider: &str,
    endpoint: &str,
    api_key: Option<&str>,
    request: &TextToImageRequest,
) -> ViralcastResult<ImageReference> {
    let mut builder = client.post(endpoint).json(request);
    if let Some(key) = api_key {
        builder = builder.bearer_auth(key);
    }

    let response = builder
        .send()
        .await
        .map_err(|e| transport_error(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = if status == StatusCode::SERVICE_UNAVAILABLE {
            let wait = body
                .get("estimated_time")
                .and_then(Value::as_f64)
                .map(|secs| format!("{:.0}", secs))
                .unwrap_or_else(|| "unknown".to_string());
            format!("Model is loading, please wait: {} seconds", wait)
        } else {
            error_message(&body).unwrap_or_else(|| format!("{} API error: {}", provider, status.as_u16()))
        };
        warn!(provider, status = status.as_u16(), message = %message, "Inference API returned error");
        return Err(ProviderError::upstream(provider, Some(status.as_u16()), message).into());
    }

    let mime = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/png")
        .to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(provider, e))?;
    debug!(provider, mime = %mime, bytes = bytes.len(), "Received generated image");

    Ok(ImageReference::inline(mime, bytes.to_vec()))
}

fn record(provider: &str, started: Instant, result: &Result<ImageReference, ViralcastError>) {
    let metrics = ProviderMetrics::get();
    match result {
        Ok(_) => metrics.record_request(provider, MODEL, started.elapsed().as_secs_f64()),
        Err(e) => metrics.record_error(provider, MODEL, e),
    }
}

const KEYED_STYLES: NicheStyles = NicheStyles {
    design: "modern design, minimalist, clean aesthetic, professional, studio lighting, 8k",
    movies: "cinematic, dramatic lighting, film photography, professional, high quality",
    news: "journalistic photography, clean, professional, balanced composition, sharp focus",
    generic: "professional, high quality, detailed, 8k resolution",
};

/// Keyed Stable Diffusion provider (Hugging Face or a compatible endpoint).
#[derive(Debug, Clone)]
pub struct StableDiffusionProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl StableDiffusionProvider {
    /// Creates a provider against the public SDXL endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            endpoint: SDXL_ENDPOINT.to_string(),
        }
    }

    /// Creates a provider from its configuration table.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let provider = Self::new(config.resolve_api_key().unwrap_or_default());
        match config.resolve_base_url() {
            Some(endpoint) => provider.with_endpoint(endpoint),
            None => provider,
        }
    }

    /// Overrides the full model endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Prompt with the niche style and quality suffix applied.
    pub fn enhance_prompt(prompt: &str, niche: &str) -> String {
        format!("{}, {}, masterpiece, best quality", prompt, KEYED_STYLES.pick(niche))
    }
}

#[async_trait]
impl ImageProvider for StableDiffusionProvider {
    fn name(&self) -> &str {
        KEYED_NAME
    }

    fn is_available(&self) -> bool {
        is_usable_api_key(&self.api_key)
    }

    #[instrument(skip(self, prompt, _style), fields(provider = KEYED_NAME))]
    async fn generate_image(
        &self,
        prompt: &str,
        niche: &str,
        _style: Option<&str>,
    ) -> ViralcastResult<ImageReference> {
        if !self.is_available() {
            return Err(unavailable(KEYED_NAME));
        }

        let request = TextToImageRequest {
            inputs: Self::enhance_prompt(prompt, niche),
            parameters: Parameters {
                width: 1024,
                height: 1024,
                num_inference_steps: Some(30),
                guidance_scale: Some(7.5),
            },
        };

        let started = Instant::now();
        let result = text_to_image(
            &self.client,
            KEYED_NAME,
            &self.endpoint,
            Some(&self.api_key),
            &request,
        )
        .await;
        record(KEYED_NAME, started, &result);
        result
    }
}

const FREE_STYLES: NicheStyles = NicheStyles {
    design: "modern design, minimalist, clean aesthetic, professional",
    movies: "cinematic, dramatic, film photography style",
    news: "journalistic photography, clean, professional",
    generic: "professional, high quality",
};

/// Keyless Stable Diffusion on the public inference endpoint.
///
/// Always available and part of the always-available fallback class: the
/// image router keeps retrying it even after failures.
#[derive(Debug, Clone)]
pub struct StableDiffusionFreeProvider {
    client: Client,
    endpoint: String,
}

impl Default for StableDiffusionFreeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StableDiffusionFreeProvider {
    /// Creates a provider against the public SDXL endpoint.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            endpoint: SDXL_ENDPOINT.to_string(),
        }
    }

    /// Overrides the full model endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Prompt with the niche style and quality suffix applied.
    pub fn enhance_prompt(prompt: &str, niche: &str) -> String {
        format!("{}, {}, 8k, detailed, sharp focus", prompt, FREE_STYLES.pick(niche))
    }
}

#[async_trait]
impl ImageProvider for StableDiffusionFreeProvider {
    fn name(&self) -> &str {
        FREE_NAME
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_always_available_fallback(&self) -> bool {
        true
    }

    #[instrument(skip(self, prompt, _style), fields(provider = FREE_NAME))]
    async fn generate_image(
        &self,
        prompt: &str,
        niche: &str,
        _style: Option<&str>,
    ) -> ViralcastResult<ImageReference> {
        let request = TextToImageRequest {
            inputs: Self::enhance_prompt(prompt, niche),
            parameters: Parameters {
                width: 1024,
                height: 1024,
                num_inference_steps: None,
                guidance_scale: None,
            },
        };

        let started = Instant::now();
        let result = text_to_image(&self.client, FREE_NAME, &self.endpoint, None, &request).await;
        record(FREE_NAME, started, &result);
        result
    }
}
