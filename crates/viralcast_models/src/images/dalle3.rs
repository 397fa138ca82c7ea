//! DALL-E 3 image provider.

use super::NicheStyles;
use crate::ProviderMetrics;
use crate::http::{transport_error, unavailable, upstream_error};
use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, warn};
use viralcast_core::ImageReference;
use viralcast_error::{ProviderError, ProviderErrorKind, ViralcastResult};
use viralcast_interface::ImageProvider;
use viralcast_rate_limit::{ProviderConfig, is_usable_api_key};

const PROVIDER_NAME: &str = "DALL-E 3";
const MODEL: &str = "dall-e-3";
const DEFAULT_STYLE: &str = "vivid";

const STYLES: NicheStyles = NicheStyles {
    design: "modern minimalist design, clean aesthetic, professional composition, studio lighting",
    movies: "cinematic composition, dramatic lighting, film aesthetic, professional photography",
    news: "journalistic style, clean and clear, professional photography, balanced composition",
    generic: "professional, high quality, detailed, sharp focus",
};

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: String,
    n: u8,
    size: &'a str,
    quality: &'a str,
    style: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    url: Option<String>,
}

/// OpenAI DALL-E 3 image generator.
///
/// The returned URL is downloaded so the image travels inline; if the download
/// fails the remote URL is returned instead.
#[derive(Debug, Clone)]
pub struct Dalle3Provider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl Dalle3Provider {
    /// Creates a provider against the public OpenAI API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
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

    /// Prompt with the niche style and quality suffix applied.
    pub fn enhance_prompt(prompt: &str, niche: &str) -> String {
        format!(
            "{}, {}, 8k resolution, high quality, photorealistic, professional photography",
            prompt,
            STYLES.pick(niche)
        )
    }

    async fn download(&self, url: &str) -> ImageReference {
        let fetched = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            let mime = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("image/png")
                .to_string();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>(ImageReference::inline(mime, bytes.to_vec()))
        };

        match fetched.await {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "Could not download generated image, returning URL");
                ImageReference::remote(url)
            }
        }
    }
}

#[async_trait]
impl ImageProvider for Dalle3Provider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        is_usable_api_key(&self.api_key)
    }

    #[instrument(skip(self, prompt), fields(provider = PROVIDER_NAME))]
    async fn generate_image(
        &self,
        prompt: &str,
        niche: &str,
        style: Option<&str>,
    ) -> ViralcastResult<ImageReference> {
        if !self.is_available() {
            return Err(unavailable(PROVIDER_NAME));
        }

        let request = ImageRequest {
            model: MODEL,
            prompt: Self::enhance_prompt(prompt, niche),
            n: 1,
            size: "1024x1024",
            quality: "hd",
            style: style.unwrap_or(DEFAULT_STYLE),
        };

        let started = Instant::now();
        let result: ViralcastResult<String> = async {
            let response = self
                .client
                .post(format!("{}/images/generations", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| transport_error(PROVIDER_NAME, e))?;

            if !response.status().is_success() {
                return Err(upstream_error(PROVIDER_NAME, response).await);
            }

            let body: ImageResponse = response.json().await.map_err(|e| {
                ProviderError::upstream(PROVIDER_NAME, None, format!("Failed to parse response: {}", e))
            })?;

            body.data
                .into_iter()
                .find_map(|datum| datum.url)
                .ok_or_else(|| {
                    ProviderError::new(ProviderErrorKind::EmptyResponse(PROVIDER_NAME.to_string()))
                        .into()
                })
        }
        .await;

        let metrics = ProviderMetrics::get();
        match result {
            Ok(url) => {
                metrics.record_request(PROVIDER_NAME, MODEL, started.elapsed().as_secs_f64());
                debug!(url = %url, "DALL-E 3 returned image URL");
                Ok(self.download(&url).await)
            }
            Err(e) => {
                metrics.record_error(PROVIDER_NAME, MODEL, &e);
                Err(e)
            }
        }
    }
}
