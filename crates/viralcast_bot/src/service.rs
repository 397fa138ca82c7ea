//! The post production pipeline.

use crate::prompts::{
    ANALYSIS_FALLBACK, analysis_prompt, analysis_system, gemini_post_schema, post_prompt,
    post_schema, post_system,
};
use crate::{BotMetrics, providers};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use viralcast_core::{
    ChannelProfile, ImageReference, MarketingStrategy, NicheType, Post, PostStatus,
    SupportedLanguage, TextOptions,
};
use viralcast_error::{ProviderError, ProviderErrorKind, ViralcastError, ViralcastResult};
use viralcast_interface::{PostPublisher, TextProvider};
use viralcast_rate_limit::ViralcastConfig;
use viralcast_router::{ImageRouter, TextRouter};

/// Pause between consecutive posts of a batch.
const DEFAULT_BATCH_PAUSE: Duration = Duration::from_millis(1500);

/// Longest publication delay a post may suggest.
const MAX_DELAY_HOURS: f64 = 24.0 * 30.0;

/// Result of a market analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    /// Research text
    pub text: String,
    /// Model that wrote it
    pub model: String,
}

impl MarketAnalysis {
    fn new(text: String, model: String) -> Self {
        let text = if text.trim().is_empty() {
            ANALYSIS_FALLBACK.to_string()
        } else {
            text
        };
        Self { text, model }
    }
}

/// Structured post as returned by a text provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    /// Attention-grabbing headline
    pub hook: String,
    /// Body text
    pub content: String,
    /// Emotional trigger line
    #[serde(default)]
    pub emotional_trigger: String,
    /// Call to action
    #[serde(default)]
    pub cta: String,
    /// Hashtags
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Prompt for the illustration
    #[serde(default)]
    pub image_prompt: String,
    /// Suggested delay before publishing, in hours
    #[serde(default)]
    pub suggested_hours_delay: f64,
}

impl PostDraft {
    /// Reads a draft out of a structured value.
    ///
    /// # Errors
    ///
    /// `MalformedStructuredOutput` when `hook` or `content` is missing or a
    /// field has the wrong type.
    pub fn from_value(value: Value) -> ViralcastResult<Self> {
        serde_json::from_value(value.clone()).map_err(|e| {
            debug!(error = %e, "Structured post does not match the schema");
            ViralcastError::from(ProviderError::new(
                ProviderErrorKind::MalformedStructuredOutput {
                    raw: value.to_string(),
                },
            ))
        })
    }

    /// Assembles a draft post created at `now`.
    ///
    /// The suggested delay is clamped to thirty days; negative or non-finite
    /// delays schedule the post for `now`.
    pub fn into_post(self, channel_id: &str, now: DateTime<Utc>) -> Post {
        let hours = if self.suggested_hours_delay.is_finite() {
            self.suggested_hours_delay.clamp(0.0, MAX_DELAY_HOURS)
        } else {
            0.0
        };
        let scheduled_for = TimeDelta::try_milliseconds((hours * 3_600_000.0) as i64)
            .and_then(|delay| now.checked_add_signed(delay))
            .unwrap_or(now);

        Post {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            scheduled_for: Some(scheduled_for),
            hook: self.hook,
            content: self.content,
            emotional_trigger: self.emotional_trigger,
            cta: self.cta,
            hashtags: self.hashtags,
            image_prompt: self.image_prompt,
            image: None,
            status: PostStatus::Draft,
            channel_id: channel_id.to_string(),
        }
    }
}

/// Researches, writes, illustrates and delivers posts.
///
/// Text goes through a [`TextRouter`] and images through an [`ImageRouter`].
/// When a Gemini provider is attached it is tried first for research (with
/// web search grounding) and for post writing (with native structured
/// output); any failure there falls back to the router.
pub struct MarketingService {
    text_router: TextRouter,
    image_router: ImageRouter,
    gemini: Option<Arc<dyn TextProvider>>,
    batch_pause: Duration,
}

impl MarketingService {
    /// Creates a service over the given routers.
    pub fn new(text_router: TextRouter, image_router: ImageRouter) -> Self {
        Self {
            text_router,
            image_router,
            gemini: None,
            batch_pause: DEFAULT_BATCH_PAUSE,
        }
    }

    /// Creates a service with every provider the configuration enables.
    pub fn from_config(config: &ViralcastConfig) -> Self {
        Self::new(providers::text_router(config), providers::image_router(config))
            .with_gemini(providers::gemini(config))
    }

    /// Attaches the provider tried first for research and post writing.
    ///
    /// Unavailable providers are ignored.
    pub fn with_gemini(mut self, gemini: Option<Arc<dyn TextProvider>>) -> Self {
        self.gemini = gemini.filter(|provider| provider.is_available());
        self
    }

    /// Sets the pause between consecutive posts of a batch.
    pub fn with_batch_pause(mut self, pause: Duration) -> Self {
        self.batch_pause = pause;
        self
    }

    /// The text router.
    pub fn text_router(&self) -> &TextRouter {
        &self.text_router
    }

    /// The image router.
    pub fn image_router(&self) -> &ImageRouter {
        &self.image_router
    }

    /// Name of the text provider the next routed call starts with.
    pub fn current_provider(&self) -> &str {
        self.text_router.current_provider_name()
    }

    /// Name of the image generator the next routed call starts with.
    pub fn current_image_generator(&self) -> &str {
        self.image_router.current_generator_name()
    }

    /// Researches trends, audience and competition for a niche.
    ///
    /// An empty answer becomes [`ANALYSIS_FALLBACK`].
    #[instrument(skip_all, fields(niche = %niche, channel_id = %channel_id, language = %language))]
    pub async fn analyze_market(
        &self,
        niche: NicheType,
        regions: &[String],
        channel_id: &str,
        language: SupportedLanguage,
    ) -> ViralcastResult<MarketAnalysis> {
        let prompt = analysis_prompt(niche, regions, language);
        let system = analysis_system(language);

        if let Some(gemini) = &self.gemini {
            let options = TextOptions::default().with_web_search(true);
            match gemini.generate_text(&prompt, Some(&system), &options).await {
                Ok(output) => {
                    info!(model = %output.model, "Market analysis grounded with web search");
                    return Ok(MarketAnalysis::new(output.text, output.model));
                }
                Err(e) => warn!(error = %e.detail(), "Search-grounded analysis failed, using router"),
            }
        }

        let result = self
            .text_router
            .generate_text(&prompt, Some(&system), &TextOptions::default())
            .await?;
        info!(provider = %result.provider, model = %result.model, "Market analysis complete");

        let model = if result.model.is_empty() {
            result.provider
        } else {
            result.model
        };
        Ok(MarketAnalysis::new(result.text, model))
    }

    /// Writes one post for `channel_id` from research `insights`.
    #[instrument(skip_all, fields(niche = %niche, channel_id = %channel_id))]
    pub async fn generate_post(
        &self,
        niche: NicheType,
        strategy: &MarketingStrategy,
        insights: &str,
        channel_id: &str,
    ) -> ViralcastResult<Post> {
        let prompt = post_prompt(niche, strategy, insights, channel_id);
        let system = post_system(strategy.language);
        let schema = post_schema(strategy.language);

        let value = match &self.gemini {
            Some(gemini) => match gemini
                .generate_json(&prompt, &gemini_post_schema(strategy.language), Some(&system))
                .await
            {
                Ok(value) => value,
                Err(e) => {
                    warn!(error = %e.detail(), "Native structured output failed, using router");
                    self.text_router
                        .generate_json(&prompt, &schema, Some(&system))
                        .await?
                }
            },
            None => {
                self.text_router
                    .generate_json(&prompt, &schema, Some(&system))
                    .await?
            }
        };

        let post = PostDraft::from_value(value)?.into_post(channel_id, Utc::now());
        debug!(post_id = %post.id, "Post drafted");
        Ok(post)
    }

    /// Generates an illustration styled for `niche`.
    #[instrument(skip_all, fields(niche = %niche))]
    pub async fn generate_image(&self, prompt: &str, niche: NicheType) -> ViralcastResult<ImageReference> {
        self.image_router
            .generate_image(prompt, &niche.to_string(), None)
            .await
    }

    /// Researches the channel's niche and produces one illustrated post.
    #[instrument(skip_all, fields(channel = %channel.id))]
    pub async fn produce_post(&self, channel: &ChannelProfile) -> ViralcastResult<Post> {
        let analysis = self.analyze(channel).await?;
        self.compose(channel, &analysis.text).await
    }

    /// Produces `count` posts from one shared analysis.
    ///
    /// Posts are spaced by the batch pause. With a `publisher`, each post is
    /// delivered as soon as it is ready and marked `Posted` or `Failed`. A post
    /// that cannot be written is skipped; the batch fails only when no post
    /// could be written at all.
    #[instrument(skip_all, fields(channel = %channel.id, count = count))]
    pub async fn produce_batch(
        &self,
        channel: &ChannelProfile,
        count: usize,
        publisher: Option<&dyn PostPublisher>,
    ) -> ViralcastResult<Vec<Post>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let analysis = self.analyze(channel).await?;
        let mut posts = Vec::with_capacity(count);
        let mut last_error = None;

        for index in 0..count {
            if index > 0 {
                tokio::time::sleep(self.batch_pause).await;
            }

            let mut post = match self.compose(channel, &analysis.text).await {
                Ok(post) => post,
                Err(e) => {
                    warn!(index, error = %e.detail(), "Post generation failed, skipping");
                    last_error = Some(e);
                    continue;
                }
            };

            if let Some(publisher) = publisher {
                self.deliver(publisher, &channel.id, &mut post).await;
            }
            posts.push(post);
        }

        match last_error {
            Some(e) if posts.is_empty() => Err(e),
            _ => {
                info!(produced = posts.len(), "Batch complete");
                Ok(posts)
            }
        }
    }

    async fn analyze(&self, channel: &ChannelProfile) -> ViralcastResult<MarketAnalysis> {
        self.analyze_market(
            channel.niche,
            &channel.strategy.regions,
            &channel.channel_id,
            channel.strategy.language,
        )
        .await
    }

    /// Writes a post and attaches an image; image failures leave it text-only.
    async fn compose(&self, channel: &ChannelProfile, insights: &str) -> ViralcastResult<Post> {
        let mut post = self
            .generate_post(channel.niche, &channel.strategy, insights, &channel.channel_id)
            .await?;

        if post.image_prompt.trim().is_empty() {
            debug!(post_id = %post.id, "No image prompt, post stays text-only");
            BotMetrics::get().record_without_image(&channel.id);
        } else {
            match self.generate_image(&post.image_prompt, channel.niche).await {
                Ok(image) => post.image = Some(image),
                Err(e) => {
                    warn!(post_id = %post.id, error = %e.detail(), "Image generation failed, post stays text-only");
                    BotMetrics::get().record_without_image(&channel.id);
                }
            }
        }

        BotMetrics::get().record_generated(&channel.id);
        Ok(post)
    }

    async fn deliver(&self, publisher: &dyn PostPublisher, channel: &str, post: &mut Post) {
        match publisher.publish(post).await {
            Ok(()) => {
                info!(post_id = %post.id, publisher = publisher.name(), "Post published");
                post.transition(PostStatus::Posted);
                BotMetrics::get().record_publish(channel, publisher.name(), true);
            }
            Err(e) => {
                warn!(post_id = %post.id, publisher = publisher.name(), error = %e, "Publishing failed");
                post.transition(PostStatus::Failed);
                BotMetrics::get().record_publish(channel, publisher.name(), false);
            }
        }
    }
}

impl std::fmt::Debug for MarketingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketingService")
            .field("text_router", &self.text_router)
            .field("image_router", &self.image_router)
            .field("gemini", &self.gemini.as_ref().map(|g| g.name()))
            .field("batch_pause", &self.batch_pause)
            .finish()
    }
}
