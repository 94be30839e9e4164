#![allow(clippy::needless_for_each)]

use emogo_core::{GpsRecord, NewGps, NewSentiment, NewVlog, SentimentRecord, VlogRecord};

use super::schemas::{
    ErrorResponse, GpsCreated, HealthResponse, MetricsResponse, SentimentCreated, StatusResponse,
    VlogCreated, VlogUploadForm,
};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Emogo Ingest API",
        version = "0.1.0",
        description = "HTTP API for the Emogo ingest service. Store emotion scores, location fixes, and video logs; list them back for the dashboard.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service health and metrics"),
        (name = "Sentiments", description = "Emotion-sentiment scores"),
        (name = "GPS", description = "Location fixes"),
        (name = "Vlogs", description = "Video logs, uploads, and video retrieval"),
    ),
    paths(
        super::health::root,
        super::health::health,
        super::sentiments::create_sentiment,
        super::sentiments::list_sentiments,
        super::gps::create_gps,
        super::gps::list_gps,
        super::vlogs::create_vlog,
        super::vlogs::upload_vlog,
        super::vlogs::list_vlogs,
        super::vlogs::get_vlog,
        super::videos::get_video,
    ),
    components(schemas(
        StatusResponse, HealthResponse, MetricsResponse, ErrorResponse,
        NewSentiment, SentimentRecord, SentimentCreated,
        NewGps, GpsRecord, GpsCreated,
        NewVlog, VlogRecord, VlogCreated, VlogUploadForm,
    ))
)]
pub struct ApiDoc;
