use std::fmt;

use serde::Deserialize;

/// OTLP transport used to ship spans to the collector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtlpProtocol {
    #[default]
    Grpc,
    Http,
}

impl OtlpProtocol {
    /// Collector address used when `endpoint` is not set.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Self::Grpc => "http://localhost:4317",
            Self::Http => "http://localhost:4318",
        }
    }
}

impl fmt::Display for OtlpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Grpc => "grpc",
            Self::Http => "http",
        })
    }
}

/// Span export for the ingest server.
///
/// Log lines always go to stdout. With `enabled = true` the gateway spans
/// (uploads, listings, blob probes) are also exported over OTLP.
///
/// ```toml
/// [telemetry]
/// enabled = true
/// protocol = "http"
/// sample_ratio = 0.2
/// environment = "study-2025"
/// ```
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub protocol: OtlpProtocol,
    /// Overrides the protocol's default collector address.
    pub endpoint: Option<String>,
    pub service_name: String,
    /// Fraction of traces kept, `0.0..=1.0`.
    pub sample_ratio: f64,
    /// Reported as `deployment.environment`.
    pub environment: Option<String>,
}

impl TelemetryConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.protocol.default_endpoint())
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            protocol: OtlpProtocol::Grpc,
            endpoint: None,
            service_name: "emogo-server".to_owned(),
            sample_ratio: 1.0,
            environment: None,
        }
    }
}
