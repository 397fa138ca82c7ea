//! Mock providers and publishers for service tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use viralcast_bot::MarketingService;
use viralcast_core::{
    ChannelProfile, ImageReference, MarketingStrategy, NicheType, Post, ProviderOutput, TextOptions,
};
use viralcast_error::{ProviderError, TelegramError, TelegramErrorKind, ViralcastResult};
use viralcast_interface::{ImageProvider, PostPublisher, TextProvider};
use viralcast_router::{ImageRouter, TextRouter};

/// Text provider answering with fixed text and JSON; unset answers fail.
#[derive(Debug, Default)]
pub struct MockWriter {
    name: String,
    text: Option<String>,
    json: Option<Value>,
    pub text_calls: Mutex<usize>,
    pub json_calls: Mutex<usize>,
    pub web_search_calls: Mutex<usize>,
    pub schemas: Mutex<Vec<Value>>,
}

impl MockWriter {
    /// A writer whose every call fails.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    pub fn model(&self) -> String {
        format!("{}-model", self.name.to_lowercase())
    }

    fn failure(&self) -> viralcast_error::ViralcastError {
        ProviderError::upstream(self.name.clone(), Some(500), format!("{} is down", self.name)).into()
    }
}

#[async_trait]
impl TextProvider for MockWriter {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn generate_text(
        &self,
        _prompt: &str,
        _system_instruction: Option<&str>,
        options: &TextOptions,
    ) -> ViralcastResult<ProviderOutput> {
        *self.text_calls.lock() += 1;
        if *options.web_search() {
            *self.web_search_calls.lock() += 1;
        }
        match &self.text {
            Some(text) => Ok(ProviderOutput::new(text.clone(), self.model())),
            None => Err(self.failure()),
        }
    }

    async fn generate_json(
        &self,
        _prompt: &str,
        schema: &Value,
        _system_instruction: Option<&str>,
    ) -> ViralcastResult<Value> {
        *self.json_calls.lock() += 1;
        self.schemas.lock().push(schema.clone());
        self.json.clone().ok_or_else(|| self.failure())
    }
}

/// Image provider that either always succeeds or always fails.
#[derive(Debug)]
pub struct MockPainter {
    name: String,
    succeed: bool,
    pub calls: Mutex<usize>,
}

impl MockPainter {
    pub fn succeeding(name: &str) -> Self {
        Self {
            name: name.to_string(),
            succeed: true,
            calls: Mutex::new(0),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            succeed: false,
            ..Self::succeeding(name)
        }
    }

    pub fn image(&self) -> ImageReference {
        ImageReference::remote(format!("https://images.test/{}.png", self.name))
    }
}

#[async_trait]
impl ImageProvider for MockPainter {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        _niche: &str,
        _style: Option<&str>,
    ) -> ViralcastResult<ImageReference> {
        *self.calls.lock() += 1;
        if self.succeed {
            Ok(self.image())
        } else {
            Err(ProviderError::upstream(self.name.clone(), Some(503), "busy").into())
        }
    }
}

/// Publisher recording delivered post ids.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    fail: bool,
    pub published: Mutex<Vec<String>>,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl PostPublisher for RecordingPublisher {
    fn name(&self) -> &str {
        "Recorder"
    }

    async fn publish(&self, post: &Post) -> ViralcastResult<()> {
        if self.fail {
            return Err(TelegramError::new(TelegramErrorKind::Api {
                status: 400,
                description: "chat not found".to_string(),
            })
            .into());
        }
        self.published.lock().push(post.id.clone());
        Ok(())
    }
}

/// A well-formed structured post.
pub fn post_json() -> Value {
    json!({
        "hook": "Chairs are back",
        "content": "Bauhaus is trending again.",
        "emotionalTrigger": "nostalgia",
        "cta": "Show us your chair",
        "hashtags": ["design", "bauhaus"],
        "imagePrompt": "a tubular steel chair",
        "suggestedHoursDelay": 2
    })
}

pub fn channel() -> ChannelProfile {
    ChannelProfile {
        id: "design-daily".to_string(),
        name: "Design Daily".to_string(),
        channel_id: "@design_daily".to_string(),
        niche: NicheType::Design,
        is_active: true,
        strategy: MarketingStrategy {
            regions: vec!["Kazakhstan".to_string()],
            ..MarketingStrategy::default()
        },
    }
}

/// Service over the given writers and painters, without batch pauses.
pub fn service(writers: &[&Arc<MockWriter>], painters: &[&Arc<MockPainter>]) -> MarketingService {
    let writers: Vec<Arc<dyn TextProvider>> = writers
        .iter()
        .map(|w| Arc::clone(*w) as Arc<dyn TextProvider>)
        .collect();
    let painters: Vec<Arc<dyn ImageProvider>> = painters
        .iter()
        .map(|p| Arc::clone(*p) as Arc<dyn ImageProvider>)
        .collect();
    MarketingService::new(TextRouter::new(writers), ImageRouter::new(painters))
        .with_batch_pause(std::time::Duration::ZERO)
}
