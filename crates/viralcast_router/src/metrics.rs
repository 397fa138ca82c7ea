//! Metrics for router decisions.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Meter},
};
use std::sync::OnceLock;
use viralcast_rate_limit::FailureClass;

static METRICS: OnceLock<RouterMetrics> = OnceLock::new();

/// OpenTelemetry counters for failover routing.
///
/// Labeled with the router kind ("text" or "image") and, where it applies,
/// the provider name.
#[derive(Clone)]
pub struct RouterMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Real provider invocations
    pub attempts: Counter<u64>,
    /// Failed provider invocations
    pub failures: Counter<u64>,
    /// Providers passed over because they are blocklisted
    pub skips: Counter<u64>,
    /// Requests that ran out of attempts
    pub exhausted: Counter<u64>,
}

impl RouterMetrics {
    fn init() -> Self {
        let meter = global::meter("viralcast_router");

        Self {
            _meter: meter.clone(),
            attempts: meter
                .u64_counter("router.attempts")
                .with_description("Real provider invocations made by routers")
                .build(),
            failures: meter
                .u64_counter("router.failures")
                .with_description("Provider invocations that failed")
                .build(),
            skips: meter
                .u64_counter("router.skips")
                .with_description("Blocklisted providers passed over")
                .build(),
            exhausted: meter
                .u64_counter("router.exhausted")
                .with_description("Requests where every provider failed")
                .build(),
        }
    }

    /// Get the global router metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a real provider invocation.
    pub fn record_attempt(&self, router: &str, provider: &str) {
        self.attempts.add(1, &labels(router, provider));
    }

    /// Record a failed invocation with its failure class.
    pub fn record_failure(&self, router: &str, provider: &str, class: FailureClass) {
        let mut labels = labels(router, provider).to_vec();
        labels.push(KeyValue::new("error_type", class.to_string()));
        self.failures.add(1, &labels);
    }

    /// Record a blocklist skip.
    pub fn record_skip(&self, router: &str, provider: &str) {
        self.skips.add(1, &labels(router, provider));
    }

    /// Record an exhausted request.
    pub fn record_exhausted(&self, router: &str) {
        self.exhausted
            .add(1, &[KeyValue::new("router", router.to_string())]);
    }
}

impl Default for RouterMetrics {
    fn default() -> Self {
        Self::get().clone()
    }
}

fn labels(router: &str, provider: &str) -> [KeyValue; 2] {
    [
        KeyValue::new("router", router.to_string()),
        KeyValue::new("provider", provider.to_string()),
    ]
}
