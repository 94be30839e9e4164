use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::schemas::ErrorResponse;
use crate::error::ServerError;

/// `GET /videos/{key}` -- stream a stored video.
#[utoipa::path(
    get,
    path = "/videos/{key}",
    tag = "Vlogs",
    summary = "Fetch video",
    description = "Serves the raw bytes of an uploaded video with its stored content type.",
    params(("key" = String, Path, description = "Storage key from the vlog record")),
    responses(
        (status = 200, description = "Video bytes", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 404, description = "No video under this key", body = ErrorResponse),
        (status = 500, description = "Blob store failure", body = ErrorResponse)
    )
)]
pub async fn get_video(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ServerError> {
    let blob = state.gateway.fetch_video(&key).await?;

    let content_type = HeaderValue::from_str(&blob.metadata.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=31536000, immutable"),
            ),
        ],
        Body::from(blob.data),
    )
        .into_response())
}
