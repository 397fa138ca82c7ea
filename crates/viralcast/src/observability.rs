//! OpenTelemetry observability for the CLI and embedding applications.
//!
//! Installs a tracing subscriber with an `EnvFilter`, a text or JSON fmt layer
//! on stderr and an OpenTelemetry bridge layer, plus global tracer and meter
//! providers so the provider, router and bot counters record into the SDK.

use opentelemetry::{KeyValue, global, trace::TracerProvider};
use opentelemetry_sdk::{
    Resource,
    metrics::{PeriodicReader, SdkMeterProvider},
    trace::SdkTracerProvider,
};
use std::env;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logs, traces and metrics.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name for telemetry attribution
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Log level filter (e.g., "info", "debug") used when `RUST_LOG` is unset
    pub log_level: String,
    /// Enable JSON-formatted logs for structured logging
    pub json_logs: bool,
    /// Export spans and metrics to stdout
    pub export_telemetry: bool,
}

impl ObservabilityConfig {
    /// Create a new configuration with the given service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            export_telemetry: false,
        }
    }

    /// Set the service version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }

    /// Enable the stdout span and metric exporters.
    pub fn with_telemetry_export(mut self, enabled: bool) -> Self {
        self.export_telemetry = enabled;
        self
    }

    /// Filter from `RUST_LOG`, falling back to the configured level.
    fn env_filter(&self) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
        match env::var(EnvFilter::DEFAULT_ENV) {
            Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
            _ => EnvFilter::try_new(&self.log_level),
        }
    }

    fn resource(&self) -> Resource {
        Resource::builder()
            .with_service_name(self.service_name.clone())
            .with_attributes(vec![KeyValue::new(
                "service.version",
                self.service_version.clone(),
            )])
            .build()
    }

    /// Tracer and meter providers for this configuration, not yet global.
    fn providers(&self) -> (SdkTracerProvider, SdkMeterProvider) {
        let resource = self.resource();

        let mut tracer_provider = SdkTracerProvider::builder().with_resource(resource.clone());
        let mut meter_provider = SdkMeterProvider::builder().with_resource(resource);

        if self.export_telemetry {
            tracer_provider =
                tracer_provider.with_simple_exporter(opentelemetry_stdout::SpanExporter::default());
            meter_provider = meter_provider.with_reader(
                PeriodicReader::builder(opentelemetry_stdout::MetricExporter::default()).build(),
            );
        }

        (tracer_provider.build(), meter_provider.build())
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

/// Keeps the installed providers alive and flushes them when dropped.
#[derive(Debug)]
pub struct ObservabilityGuard {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    exporting: bool,
}

impl ObservabilityGuard {
    /// The global meter provider the metric counters record into.
    pub fn meter_provider(&self) -> &SdkMeterProvider {
        &self.meter_provider
    }
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        // Nothing to flush without exporters.
        if !self.exporting {
            return;
        }
        if let Err(e) = self.tracer_provider.shutdown() {
            tracing::warn!(error = %e, "Failed to flush traces");
        }
        if let Err(e) = self.meter_provider.shutdown() {
            tracing::warn!(error = %e, "Failed to flush metrics");
        }
    }
}

/// Initialize observability with the default configuration.
pub fn init_observability() -> Result<ObservabilityGuard, Box<dyn std::error::Error>> {
    init_observability_with_config(ObservabilityConfig::default())
}

/// Initialize observability with a custom configuration.
///
/// This sets up:
/// - Global tracer and meter providers carrying the service name and version
/// - Tracing with the OpenTelemetry bridge layer
/// - Stdout span and metric exporters when `export_telemetry` is set
/// - Text or JSON logs on stderr
///
/// Metric instruments are created on first use, so call this before any
/// provider or router runs. Fails if a global subscriber is already installed.
pub fn init_observability_with_config(
    config: ObservabilityConfig,
) -> Result<ObservabilityGuard, Box<dyn std::error::Error>> {
    let env_filter = config.env_filter()?;
    let (tracer_provider, meter_provider) = config.providers();

    let tracer = tracer_provider.tracer(config.service_name.clone());
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    global::set_tracer_provider(tracer_provider.clone());
    global::set_meter_provider(meter_provider.clone());

    tracing::debug!(
        service = %config.service_name,
        version = %config.service_version,
        json = config.json_logs,
        export = config.export_telemetry,
        "Observability initialized"
    );
    Ok(ObservabilityGuard {
        tracer_provider,
        meter_provider,
        exporting: config.export_telemetry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::metrics::MeterProvider;

    #[test]
    fn test_builder() {
        let config = ObservabilityConfig::new("viralcast-test")
            .with_version("9.9.9")
            .with_log_level("debug")
            .with_json_logs(true)
            .with_telemetry_export(true);
        assert_eq!(config.service_name, "viralcast-test");
        assert_eq!(config.service_version, "9.9.9");
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
        assert!(config.export_telemetry);
        assert!(!ObservabilityConfig::default().export_telemetry);
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let config = ObservabilityConfig::default().with_log_level("viralcast=loudest");
        // RUST_LOG takes precedence when set, so only check the fallback path.
        if env::var(EnvFilter::DEFAULT_ENV).is_err() {
            assert!(config.env_filter().is_err());
        }
    }

    #[test]
    fn test_providers_record_and_shut_down() -> anyhow::Result<()> {
        let (tracer_provider, meter_provider) = ObservabilityConfig::new("viralcast-test")
            .with_telemetry_export(true)
            .providers();

        let counter = meter_provider
            .meter("viralcast-test")
            .u64_counter("test.events")
            .build();
        counter.add(1, &[KeyValue::new("provider", "Groq")]);

        meter_provider.shutdown()?;
        tracer_provider.shutdown()?;
        Ok(())
    }
}
