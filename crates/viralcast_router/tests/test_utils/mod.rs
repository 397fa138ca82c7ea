//! Test utilities for router tests.
//!
//! Scripted providers that replay a fixed sequence of outcomes and count how
//! often they were called.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use viralcast_core::{ImageReference, ProviderOutput, TextOptions};
use viralcast_error::{HttpError, ProviderError, ViralcastError, ViralcastResult};
use viralcast_interface::{ImageProvider, TextProvider};

/// A single scripted outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockResponse {
    /// Succeed
    Success,
    /// Fail with HTTP 429
    RateLimited,
    /// Fail with a transport error (not rate-limit class)
    Failure,
}

/// Replays scripted outcomes; the last one repeats once the script runs out.
#[derive(Debug)]
struct Script {
    responses: Vec<MockResponse>,
    calls: Mutex<usize>,
}

impl Script {
    fn new(responses: Vec<MockResponse>) -> Self {
        assert!(!responses.is_empty(), "script needs at least one response");
        Self {
            responses,
            calls: Mutex::new(0),
        }
    }

    fn next(&self, name: &str) -> ViralcastResult<()> {
        let mut calls = self.calls.lock();
        let index = (*calls).min(self.responses.len() - 1);
        *calls += 1;

        match self.responses[index] {
            MockResponse::Success => Ok(()),
            MockResponse::RateLimited => Err(rate_limit_error(name)),
            MockResponse::Failure => Err(HttpError::new(format!("{} connection reset", name)).into()),
        }
    }

    fn count(&self) -> usize {
        *self.calls.lock()
    }
}

/// The error a rate-limited mock returns.
pub fn rate_limit_error(name: &str) -> ViralcastError {
    ProviderError::upstream(name, Some(429), format!("{} rate limit reached", name)).into()
}

/// Scripted text provider.
#[derive(Debug)]
pub struct MockTextProvider {
    name: String,
    available: bool,
    script: Script,
}

impl MockTextProvider {
    /// Provider replaying `responses`.
    pub fn new(name: &str, responses: Vec<MockResponse>) -> Self {
        Self {
            name: name.to_string(),
            available: true,
            script: Script::new(responses),
        }
    }

    /// Always succeeds.
    pub fn succeeding(name: &str) -> Self {
        Self::new(name, vec![MockResponse::Success])
    }

    /// Always fails with HTTP 429.
    pub fn rate_limited(name: &str) -> Self {
        Self::new(name, vec![MockResponse::RateLimited])
    }

    /// Always fails with a generic error.
    pub fn failing(name: &str) -> Self {
        Self::new(name, vec![MockResponse::Failure])
    }

    /// Reports itself unavailable.
    pub fn unavailable(name: &str) -> Self {
        Self {
            available: false,
            ..Self::succeeding(name)
        }
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        self.script.count()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn generate_text(
        &self,
        _prompt: &str,
        _system_instruction: Option<&str>,
        _options: &TextOptions,
    ) -> ViralcastResult<ProviderOutput> {
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        self.script.next(&self.name)?;
        Ok(ProviderOutput::new(format!("{} text", self.name), "mock-model"))
    }

    async fn generate_json(
        &self,
        _prompt: &str,
        _schema: &serde_json::Value,
        _system_instruction: Option<&str>,
    ) -> ViralcastResult<serde_json::Value> {
        self.script.next(&self.name)?;
        Ok(json!({"provider": self.name}))
    }
}

/// Scripted image provider.
#[derive(Debug)]
pub struct MockImageProvider {
    name: String,
    fallback: bool,
    available: bool,
    script: Script,
}

impl MockImageProvider {
    /// Generator replaying `responses`.
    pub fn new(name: &str, responses: Vec<MockResponse>) -> Self {
        Self {
            name: name.to_string(),
            fallback: false,
            available: true,
            script: Script::new(responses),
        }
    }

    /// Always succeeds.
    pub fn succeeding(name: &str) -> Self {
        Self::new(name, vec![MockResponse::Success])
    }

    /// Always fails with HTTP 429.
    pub fn rate_limited(name: &str) -> Self {
        Self::new(name, vec![MockResponse::RateLimited])
    }

    /// Always fails with a generic error.
    pub fn failing(name: &str) -> Self {
        Self::new(name, vec![MockResponse::Failure])
    }

    /// Reports itself unavailable.
    pub fn unavailable(name: &str) -> Self {
        Self {
            available: false,
            ..Self::succeeding(name)
        }
    }

    /// Marks the generator as an always-available fallback.
    pub fn as_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        self.script.count()
    }

    /// The image a successful call returns.
    pub fn image_for(name: &str) -> ImageReference {
        ImageReference::remote(format!("https://images.test/{}", name))
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn is_always_available_fallback(&self) -> bool {
        self.fallback
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        _niche: &str,
        _style: Option<&str>,
    ) -> ViralcastResult<ImageReference> {
        self.script.next(&self.name)?;
        Ok(Self::image_for(&self.name))
    }
}

/// The router error kind inside `error`, if it is one.
pub fn router_kind(error: &ViralcastError) -> Option<&viralcast_error::RouterErrorKind> {
    match error.kind() {
        viralcast_error::ViralcastErrorKind::Router(e) => Some(&e.kind),
        _ => None,
    }
}
