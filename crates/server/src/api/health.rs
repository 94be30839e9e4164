use axum::Json;
use axum::extract::State;

use super::AppState;
use super::schemas::{HealthResponse, StatusResponse};

/// `GET /` -- liveness probe.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    summary = "Liveness",
    responses(
        (status = 200, description = "Service is up", body = StatusResponse)
    )
)]
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".into(),
    })
}

/// `GET /health` -- service status together with a metrics snapshot.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Health check",
    description = "Returns service status, the configured backends, and ingestion counters.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let gw = &state.gateway;
    Json(HealthResponse {
        status: "ok".into(),
        records: gw.record_backend().into(),
        blobs: gw.blob_backend().into(),
        metrics: gw.metrics().snapshot().into(),
    })
}
