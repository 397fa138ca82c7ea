//! Builds providers and routers from a [`ViralcastConfig`].
//!
//! Text providers are tried Gemini, DeepSeek, OpenAI, Groq. Image generators
//! go from paid to free: DALL-E 3, Gemini Image, Stable Diffusion, then the
//! keyless Stable Diffusion and free-image fallbacks.

use std::sync::Arc;
use tracing::debug;
use viralcast_interface::{ImageProvider, TextProvider};
use viralcast_models::{
    Dalle3Provider, FreeImageProvider, GeminiImageProvider, GeminiProvider,
    OpenAiCompatibleProvider, OpenAiFlavor, StableDiffusionFreeProvider, StableDiffusionProvider,
};
use viralcast_rate_limit::ViralcastConfig;
use viralcast_router::{ImageRouter, TextRouter};

/// Gemini, when its key is configured.
pub fn gemini(config: &ViralcastConfig) -> Option<Arc<dyn TextProvider>> {
    let provider = GeminiProvider::from_config(&config.provider("gemini"));
    if provider.is_available() {
        Some(Arc::new(provider))
    } else {
        debug!("Gemini not configured");
        None
    }
}

/// Every text provider in routing order, available or not.
pub fn text_providers(config: &ViralcastConfig) -> Vec<Arc<dyn TextProvider>> {
    let mut providers: Vec<Arc<dyn TextProvider>> =
        vec![Arc::new(GeminiProvider::from_config(&config.provider("gemini")))];

    for flavor in [OpenAiFlavor::DeepSeek, OpenAiFlavor::OpenAi, OpenAiFlavor::Groq] {
        providers.push(Arc::new(OpenAiCompatibleProvider::from_config(
            flavor,
            &config.provider(flavor.config_key()),
        )));
    }
    providers
}

/// Every image generator in routing order, available or not.
pub fn image_providers(config: &ViralcastConfig) -> Vec<Arc<dyn ImageProvider>> {
    let free_sd = config.provider("stable_diffusion_free");
    let free_sd = match free_sd.resolve_base_url() {
        Some(endpoint) => StableDiffusionFreeProvider::new().with_endpoint(endpoint),
        None => StableDiffusionFreeProvider::new(),
    };

    vec![
        Arc::new(Dalle3Provider::from_config(&config.provider("dalle3"))),
        Arc::new(GeminiImageProvider::from_config(&config.provider("gemini_image"))),
        Arc::new(StableDiffusionProvider::from_config(
            &config.provider("stable_diffusion"),
        )),
        Arc::new(free_sd),
        Arc::new(FreeImageProvider::from_config(&config.provider("free_images"))),
    ]
}

/// Text router over the configured providers.
pub fn text_router(config: &ViralcastConfig) -> TextRouter {
    TextRouter::with_config(text_providers(config), config.router)
}

/// Image router over the configured generators.
pub fn image_router(config: &ViralcastConfig) -> ImageRouter {
    ImageRouter::with_config(image_providers(config), config.router)
}
