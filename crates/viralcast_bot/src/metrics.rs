//! Metrics for post production.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Meter},
};
use std::sync::OnceLock;

static METRICS: OnceLock<BotMetrics> = OnceLock::new();

/// OpenTelemetry counters for the post pipeline, labeled by channel.
#[derive(Clone)]
pub struct BotMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Posts assembled
    pub posts_generated: Counter<u64>,
    /// Posts that went out without an image
    pub posts_without_image: Counter<u64>,
    /// Posts delivered
    pub posts_published: Counter<u64>,
    /// Deliveries that failed
    pub publish_failures: Counter<u64>,
}

impl BotMetrics {
    fn init() -> Self {
        let meter = global::meter("viralcast_bot");

        Self {
            _meter: meter.clone(),
            posts_generated: meter
                .u64_counter("bot.posts.generated")
                .with_description("Posts assembled")
                .build(),
            posts_without_image: meter
                .u64_counter("bot.posts.without_image")
                .with_description("Posts whose illustration failed")
                .build(),
            posts_published: meter
                .u64_counter("bot.posts.published")
                .with_description("Posts delivered to their channel")
                .build(),
            publish_failures: meter
                .u64_counter("bot.posts.publish_failures")
                .with_description("Posts whose delivery failed")
                .build(),
        }
    }

    /// Get the global bot metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record an assembled post.
    pub fn record_generated(&self, channel: &str) {
        self.posts_generated.add(1, &labels(channel));
    }

    /// Record a post left without an image.
    pub fn record_without_image(&self, channel: &str) {
        self.posts_without_image.add(1, &labels(channel));
    }

    /// Record a delivery outcome.
    pub fn record_publish(&self, channel: &str, publisher: &str, success: bool) {
        let labels = [
            KeyValue::new("channel", channel.to_string()),
            KeyValue::new("publisher", publisher.to_string()),
        ];
        if success {
            self.posts_published.add(1, &labels);
        } else {
            self.publish_failures.add(1, &labels);
        }
    }
}

fn labels(channel: &str) -> [KeyValue; 1] {
    [KeyValue::new("channel", channel.to_string())]
}
