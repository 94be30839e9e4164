use axum::Json;
use axum::extract::State;

use emogo_core::{NewSentiment, SentimentRecord};

use super::AppState;
use super::schemas::{ErrorResponse, STATUS_SUCCESS, SentimentCreated};
use crate::error::ServerError;

/// `POST /sentiments` -- store an emotion score.
#[utoipa::path(
    post,
    path = "/sentiments",
    tag = "Sentiments",
    summary = "Create sentiment",
    description = "Validates and stores an emotion score between 0 and 10. A missing timestamp defaults to the ingestion time.",
    request_body = NewSentiment,
    responses(
        (status = 200, description = "Sentiment stored", body = SentimentCreated),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Record store failure", body = ErrorResponse)
    )
)]
pub async fn create_sentiment(
    State(state): State<AppState>,
    Json(input): Json<NewSentiment>,
) -> Result<Json<SentimentCreated>, ServerError> {
    let data = state.gateway.create_sentiment(input).await?;
    Ok(Json(SentimentCreated {
        status: STATUS_SUCCESS,
        data,
    }))
}

/// `GET /sentiments` -- list sentiments in insertion order.
#[utoipa::path(
    get,
    path = "/sentiments",
    tag = "Sentiments",
    summary = "List sentiments",
    responses(
        (status = 200, description = "Stored sentiments", body = Vec<SentimentRecord>),
        (status = 500, description = "Record store failure", body = ErrorResponse)
    )
)]
pub async fn list_sentiments(
    State(state): State<AppState>,
) -> Result<Json<Vec<SentimentRecord>>, ServerError> {
    Ok(Json(state.gateway.list_sentiments().await?))
}
