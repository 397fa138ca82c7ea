//! Capability contracts for text and image backends.

use async_trait::async_trait;
use viralcast_core::{ImageReference, Post, ProviderOutput, TextOptions};
use viralcast_error::ViralcastResult;

/// Contract every text/JSON generation backend satisfies.
///
/// Implementations are stateless between calls apart from configuration fixed
/// at construction, do no caching, and never retry internally; retrying is the
/// router's job.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Unique human-readable provider name (e.g., "Groq").
    fn name(&self) -> &str;

    /// Whether the provider has enough configuration to attempt a call.
    ///
    /// Must be pure and side-effect free.
    fn is_available(&self) -> bool;

    /// Performs one upstream call and returns the generated text.
    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        options: &TextOptions,
    ) -> ViralcastResult<ProviderOutput>;

    /// Generates a structured value loosely conforming to `schema`.
    ///
    /// Backends without native structured output append the schema to the
    /// prompt and post-process the reply with the shared normalizer.
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        system_instruction: Option<&str>,
    ) -> ViralcastResult<serde_json::Value>;
}

/// Contract every image generation backend satisfies.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Unique human-readable provider name (e.g., "DALL-E 3").
    fn name(&self) -> &str;

    /// Whether the provider has enough configuration to attempt a call.
    fn is_available(&self) -> bool;

    /// Providers that need no credentials and exist to guarantee some output.
    ///
    /// The image router never blocklists or skips these.
    fn is_always_available_fallback(&self) -> bool {
        false
    }

    /// Generates one image for `prompt`, styled for the `niche` classifier.
    async fn generate_image(
        &self,
        prompt: &str,
        niche: &str,
        style: Option<&str>,
    ) -> ViralcastResult<ImageReference>;
}

/// Delivery sink for finished posts.
#[async_trait]
pub trait PostPublisher: Send + Sync {
    /// Name of the destination (e.g., "Telegram").
    fn name(&self) -> &str;

    /// Delivers `post` to its channel.
    async fn publish(&self, post: &Post) -> ViralcastResult<()>;
}
