//! Tracing subscriber setup with an optional OTLP export layer.
//!
//! Logging always goes through `tracing_subscriber::fmt` filtered by
//! `RUST_LOG` (default `info`). When `[telemetry] enabled = true`, spans are
//! also exported over OTLP and the W3C propagator is installed so inbound
//! and outbound requests share trace ids.

use std::time::Duration;

use opentelemetry::trace::{TraceError, TracerProvider};
use opentelemetry::{KeyValue, global};
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{BatchSpanProcessor, Sampler, SdkTracerProvider};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{OtlpProtocol, TelemetryConfig};

/// Handle returned by [`init`]; call [`TelemetryGuard::shutdown`] before
/// exit to flush buffered spans.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Flush and stop the exporter, if one is running.
    pub fn shutdown(mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            tracing::warn!(error = %e, "tracer provider shutdown failed");
        }
    }

    /// Shut down, then hand back `result` unchanged so a failed run still
    /// flushes its spans before the error propagates.
    pub fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E> {
        self.shutdown();
        result
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_fmt_only() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the global subscriber.
///
/// An exporter that fails to build leaves the process on fmt-only logging;
/// telemetry problems never stop the server from starting.
pub fn init(config: &TelemetryConfig) -> TelemetryGuard {
    if !config.enabled {
        init_fmt_only();
        return TelemetryGuard { provider: None };
    }

    global::set_text_map_propagator(TraceContextPropagator::new());

    let exporter = match build_exporter(config) {
        Ok(exporter) => exporter,
        Err(e) => {
            init_fmt_only();
            tracing::error!(
                error = %e,
                endpoint = %config.endpoint(),
                "failed to build OTLP exporter, continuing without span export"
            );
            return TelemetryGuard { provider: None };
        }
    };

    let provider = SdkTracerProvider::builder()
        .with_span_processor(BatchSpanProcessor::builder(exporter).build())
        .with_sampler(sampler(config.sample_ratio))
        .with_resource(resource(config))
        .build();
    global::set_tracer_provider(provider.clone());

    let otel_layer = tracing_opentelemetry::layer().with_tracer(provider.tracer("formrelay"));
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .init();

    info!(
        endpoint = %config.endpoint(),
        protocol = %config.protocol,
        sample_ratio = config.sample_ratio,
        "OpenTelemetry span export enabled"
    );

    TelemetryGuard {
        provider: Some(provider),
    }
}

fn resource(config: &TelemetryConfig) -> Resource {
    Resource::builder()
        .with_attributes([
            KeyValue::new("service.name", config.service_name.clone()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ])
        .build()
}

fn sampler(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

fn build_exporter(config: &TelemetryConfig) -> Result<SpanExporter, TraceError> {
    let timeout = Duration::from_secs(config.timeout_seconds);

    match config.protocol {
        OtlpProtocol::Http => SpanExporter::builder()
            .with_http()
            .with_endpoint(config.endpoint())
            .with_timeout(timeout)
            .build(),
        OtlpProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint())
            .with_timeout(timeout)
            .build(),
    }
}
