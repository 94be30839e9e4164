//! Log output plus optional OTLP span export.
//!
//! Every run gets a `fmt` layer filtered by `RUST_LOG` (default `info`).
//! With `[telemetry] enabled = true` the same spans also reach a collector.

use opentelemetry::trace::{TraceError, TracerProvider};
use opentelemetry::{KeyValue, global};
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::{BatchSpanProcessor, Sampler, SdkTracerProvider};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{OtlpProtocol, TelemetryConfig};

/// Keeps the tracer provider alive. Call [`TelemetryGuard::shutdown`] to
/// flush spans before exit.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    pub fn shutdown(mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            tracing::warn!(error = %e, "span exporter shutdown failed");
        }
    }
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Install a plain `fmt` subscriber, for subcommands that run before the
/// configuration is known.
pub fn init_fmt() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the global subscriber.
///
/// A collector that cannot be configured is logged and the server keeps
/// running with log output only.
pub fn init(config: &TelemetryConfig) -> TelemetryGuard {
    if !config.enabled {
        init_fmt();
        return TelemetryGuard { provider: None };
    }

    let provider = match tracer_provider(config) {
        Ok(provider) => provider,
        Err(e) => {
            init_fmt();
            tracing::error!(
                error = %e,
                endpoint = config.endpoint(),
                protocol = %config.protocol,
                "span export disabled"
            );
            return TelemetryGuard { provider: None };
        }
    };
    global::set_tracer_provider(provider.clone());

    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_opentelemetry::layer().with_tracer(provider.tracer("emogo")))
        .init();

    info!(
        endpoint = config.endpoint(),
        protocol = %config.protocol,
        sample_ratio = config.sample_ratio,
        "exporting spans"
    );
    TelemetryGuard {
        provider: Some(provider),
    }
}

fn tracer_provider(config: &TelemetryConfig) -> Result<SdkTracerProvider, TraceError> {
    let exporter = match config.protocol {
        OtlpProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint())
            .build()?,
        OtlpProtocol::Http => SpanExporter::builder()
            .with_http()
            .with_endpoint(config.endpoint())
            .build()?,
    };

    Ok(SdkTracerProvider::builder()
        .with_span_processor(BatchSpanProcessor::builder(exporter).build())
        .with_sampler(sampler(config.sample_ratio))
        .with_resource(resource(config))
        .build())
}

fn resource_attributes(config: &TelemetryConfig) -> Vec<KeyValue> {
    let mut attributes = vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ];
    if let Some(environment) = &config.environment {
        attributes.push(KeyValue::new("deployment.environment", environment.clone()));
    }
    attributes
}

fn resource(config: &TelemetryConfig) -> Resource {
    Resource::builder()
        .with_attributes(resource_attributes(config))
        .build()
}

fn sampler(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 || ratio.is_nan() {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}
