use axum::Json;
use axum::extract::{Multipart, Path, State};

use emogo_core::{CoreError, Location, NewVlog, VlogRecord, VlogUploadMeta};
use emogo_gateway::{GatewayError, VideoUpload};

use super::AppState;
use super::schemas::{ErrorResponse, STATUS_SUCCESS, VlogCreated, VlogUploadForm};
use crate::error::ServerError;

/// `POST /vlogs` -- record a vlog hosted at an external URL.
#[utoipa::path(
    post,
    path = "/vlogs",
    tag = "Vlogs",
    summary = "Create vlog from URL",
    description = "Stores vlog metadata pointing at an already hosted video. No bytes are uploaded.",
    request_body = NewVlog,
    responses(
        (status = 200, description = "Vlog stored", body = VlogCreated),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Record store failure", body = ErrorResponse)
    )
)]
pub async fn create_vlog(
    State(state): State<AppState>,
    Json(input): Json<NewVlog>,
) -> Result<Json<VlogCreated>, ServerError> {
    let data = state.gateway.create_vlog_from_url(input).await?;
    Ok(Json(VlogCreated {
        status: STATUS_SUCCESS,
        data,
    }))
}

/// `POST /vlogs/upload` -- upload a video and record its metadata.
#[utoipa::path(
    post,
    path = "/vlogs/upload",
    tag = "Vlogs",
    summary = "Upload vlog",
    description = "Stores the `file` part in the blob store and returns the vlog record whose `video_url` serves it.",
    request_body(content = VlogUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Vlog uploaded", body = VlogCreated),
        (status = 400, description = "Invalid metadata or upload", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 501, description = "Blob backend does not accept uploads", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn upload_vlog(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<VlogCreated>, ServerError> {
    let (upload, meta) = read_upload_form(multipart).await?;
    let data = state.gateway.create_vlog(upload, meta).await?;
    Ok(Json(VlogCreated {
        status: STATUS_SUCCESS,
        data,
    }))
}

/// `GET /vlogs` -- list vlogs whose video currently resolves.
#[utoipa::path(
    get,
    path = "/vlogs",
    tag = "Vlogs",
    summary = "List vlogs",
    description = "Returns vlogs in insertion order. Records whose video can no longer be found are omitted.",
    responses(
        (status = 200, description = "Resolvable vlogs", body = Vec<VlogRecord>),
        (status = 500, description = "Record store failure", body = ErrorResponse)
    )
)]
pub async fn list_vlogs(State(state): State<AppState>) -> Result<Json<Vec<VlogRecord>>, ServerError> {
    Ok(Json(state.gateway.list_vlogs().await?))
}

/// `GET /vlogs/{id}` -- fetch one vlog.
#[utoipa::path(
    get,
    path = "/vlogs/{id}",
    tag = "Vlogs",
    summary = "Get vlog",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "The vlog", body = VlogRecord),
        (status = 404, description = "Unknown or unresolvable vlog", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_vlog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VlogRecord>, ServerError> {
    Ok(Json(state.gateway.get_vlog(&id).await?))
}

fn invalid(field: &'static str, reason: impl std::fmt::Display) -> GatewayError {
    GatewayError::Validation(CoreError::InvalidField {
        field,
        reason: reason.to_string(),
    })
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

/// Split the multipart form into the payload and its descriptive fields.
///
/// The payload may be sent as `file` or `video`; unknown parts are ignored.
async fn read_upload_form(
    mut multipart: Multipart,
) -> Result<(VideoUpload, VlogUploadMeta), ServerError> {
    let mut upload = None;
    let mut meta = VlogUploadMeta::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "file" | "video" => {
                let filename = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let mut video = VideoUpload::new(field.bytes().await?);
                video.filename = filename;
                video.content_type = content_type;
                upload = Some(video);
            }
            "user_id" => meta.user_id = field.text().await?,
            "duration" => {
                meta.duration = match non_blank(field.text().await?) {
                    Some(text) => Some(
                        text.trim()
                            .parse::<f64>()
                            .map_err(|e| invalid("duration", e))?,
                    ),
                    None => None,
                };
            }
            "timestamp" => meta.timestamp = non_blank(field.text().await?),
            "location" => {
                meta.location = match non_blank(field.text().await?) {
                    Some(text) => Some(
                        serde_json::from_str::<Location>(&text)
                            .map_err(|e| invalid("location", format!("expected a JSON object: {e}")))?,
                    ),
                    None => None,
                };
            }
            other => tracing::debug!(field = %other, "ignoring unknown upload field"),
        }
    }

    let upload = upload
        .ok_or_else(|| GatewayError::InvalidUpload("missing 'file' part".into()))?;
    Ok((upload, meta))
}
