use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use emogo_blob::BlobError;
use emogo_gateway::GatewayError;

/// Errors that can occur when running the Emogo server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A gateway-level error surfaced through the API.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The multipart upload body could not be read.
    #[error("malformed upload: {0}")]
    Multipart(#[from] MultipartError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Config(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Multipart(e) => e.status(),
            Self::Gateway(e) => match e {
                GatewayError::Validation(_) | GatewayError::InvalidUpload(_) => {
                    StatusCode::BAD_REQUEST
                }
                GatewayError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
                GatewayError::Blob(BlobError::Unsupported(_)) => StatusCode::NOT_IMPLEMENTED,
                GatewayError::Records(_)
                | GatewayError::Blob(_)
                | GatewayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use emogo_core::CoreError;

    use super::*;

    fn status_of(e: GatewayError) -> StatusCode {
        ServerError::from(e).status()
    }

    #[test]
    fn gateway_errors_map_to_statuses() {
        assert_eq!(
            status_of(GatewayError::Validation(CoreError::MissingField("user_id"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GatewayError::InvalidUpload("empty".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GatewayError::UploadTooLarge { size: 2, limit: 1 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(GatewayError::NotFound("vlog x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(GatewayError::Blob(BlobError::Storage("io".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(GatewayError::Blob(BlobError::Unsupported("put".into()))),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            status_of(GatewayError::Records(emogo_records::RecordError::Backend(
                "down".into()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
