mod blobs;
mod records;
mod server;
mod telemetry;


pub use blobs::*;
pub use records::*;
pub use server::*;
pub use telemetry::*;

use serde::Deserialize;

/// Top-level configuration for the Emogo server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct EmogoConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Record store backend configuration.
    #[serde(default)]
    pub records: RecordsConfig,
    /// Blob store backend configuration.
    #[serde(default)]
    pub blobs: BlobsConfig,
    /// Dashboard static file configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// OpenTelemetry distributed tracing configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
