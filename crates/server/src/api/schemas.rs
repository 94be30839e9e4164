use serde::Serialize;
use utoipa::ToSchema;

use emogo_core::{GpsRecord, SentimentRecord, VlogRecord};
use emogo_gateway::MetricsSnapshot;

/// Value of `status` in every successful create response.
pub const STATUS_SUCCESS: &str = "success";

/// Response for `GET /`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// Response for `GET /health`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    /// Record store backend in use.
    #[schema(example = "memory")]
    pub records: String,
    /// Blob store backend in use.
    #[schema(example = "disk")]
    pub blobs: String,
    pub metrics: MetricsResponse,
}

/// Ingestion and reconciliation counters.
#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsResponse {
    pub sentiments_created: u64,
    pub gps_created: u64,
    pub vlogs_created: u64,
    pub uploads_stored: u64,
    pub uploads_rejected: u64,
    /// Vlogs hidden from reads because their video did not resolve.
    pub vlogs_hidden: u64,
    pub blob_faults: u64,
    pub decode_failures: u64,
    pub videos_served: u64,
}

impl From<MetricsSnapshot> for MetricsResponse {
    fn from(snap: MetricsSnapshot) -> Self {
        Self {
            sentiments_created: snap.sentiments_created,
            gps_created: snap.gps_created,
            vlogs_created: snap.vlogs_created,
            uploads_stored: snap.uploads_stored,
            uploads_rejected: snap.uploads_rejected,
            vlogs_hidden: snap.vlogs_hidden,
            blob_faults: snap.blob_faults,
            decode_failures: snap.decode_failures,
            videos_served: snap.videos_served,
        }
    }
}

/// Response for `POST /sentiments`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SentimentCreated {
    #[schema(example = "success")]
    pub status: &'static str,
    pub data: SentimentRecord,
}

/// Response for `POST /gps`.
#[derive(Debug, Serialize, ToSchema)]
pub struct GpsCreated {
    #[schema(example = "success")]
    pub status: &'static str,
    pub data: GpsRecord,
}

/// Response for `POST /vlogs` and `POST /vlogs/upload`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VlogCreated {
    #[schema(example = "success")]
    pub status: &'static str,
    pub data: VlogRecord,
}

/// Multipart form accepted by `POST /vlogs/upload`. Documentation only.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct VlogUploadForm {
    /// The video file.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub user_id: String,
    /// Clip length in seconds.
    pub duration: Option<f64>,
    /// ISO-8601 timestamp; defaults to the ingestion time.
    pub timestamp: Option<String>,
    /// JSON-encoded location object.
    pub location: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "not found: vlog 0190f7c2")]
    pub error: String,
}
