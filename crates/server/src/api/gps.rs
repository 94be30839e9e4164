use axum::Json;
use axum::extract::State;

use emogo_core::{GpsRecord, NewGps};

use super::AppState;
use super::schemas::{ErrorResponse, GpsCreated, STATUS_SUCCESS};
use crate::error::ServerError;

/// `POST /gps` -- store a location fix.
#[utoipa::path(
    post,
    path = "/gps",
    tag = "GPS",
    summary = "Create GPS fix",
    request_body = NewGps,
    responses(
        (status = 200, description = "Fix stored", body = GpsCreated),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse),
        (status = 500, description = "Record store failure", body = ErrorResponse)
    )
)]
pub async fn create_gps(
    State(state): State<AppState>,
    Json(input): Json<NewGps>,
) -> Result<Json<GpsCreated>, ServerError> {
    let data = state.gateway.create_gps(input).await?;
    Ok(Json(GpsCreated {
        status: STATUS_SUCCESS,
        data,
    }))
}

/// `GET /gps` -- list location fixes in insertion order.
#[utoipa::path(
    get,
    path = "/gps",
    tag = "GPS",
    summary = "List GPS fixes",
    responses(
        (status = 200, description = "Stored fixes", body = Vec<GpsRecord>),
        (status = 500, description = "Record store failure", body = ErrorResponse)
    )
)]
pub async fn list_gps(State(state): State<AppState>) -> Result<Json<Vec<GpsRecord>>, ServerError> {
    Ok(Json(state.gateway.list_gps().await?))
}
