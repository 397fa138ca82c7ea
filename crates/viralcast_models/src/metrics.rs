//! Metrics for provider API calls.
//!
//! Provides OpenTelemetry-based metrics for tracking upstream call volume,
//! failures and latency across every text and image provider.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::OnceLock;
use viralcast_error::ViralcastError;
use viralcast_rate_limit::classify;

static METRICS: OnceLock<ProviderMetrics> = OnceLock::new();

/// Metrics for upstream provider calls.
///
/// Labeled with the provider name ("Groq", "DALL-E 3", ...) and model.
#[derive(Clone)]
pub struct ProviderMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Successful upstream calls
    pub requests: Counter<u64>,
    /// Failed upstream calls
    pub errors: Counter<u64>,
    /// Upstream call duration in seconds
    pub duration: Histogram<f64>,
}

impl ProviderMetrics {
    fn init() -> Self {
        let meter = global::meter("viralcast_provider");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("provider.requests")
                .with_description("Successful upstream provider calls")
                .build(),
            errors: meter
                .u64_counter("provider.errors")
                .with_description("Failed upstream provider calls")
                .build(),
            duration: meter
                .f64_histogram("provider.duration")
                .with_unit("seconds")
                .with_description("Upstream provider call duration")
                .build(),
        }
    }

    /// Get the global provider metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a successful upstream call.
    pub fn record_request(&self, provider: &str, model: &str, duration_secs: f64) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
        ];
        self.requests.add(1, labels);
        self.duration.record(duration_secs, labels);
    }

    /// Record a failed upstream call, labeled by failure class.
    pub fn record_error(&self, provider: &str, model: &str, error: &ViralcastError) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
            KeyValue::new("error_type", classify(error).to_string()),
        ];
        self.errors.add(1, labels);
    }
}

impl Default for ProviderMetrics {
    fn default() -> Self {
        Self::get().clone()
    }
}
