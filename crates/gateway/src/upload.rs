use bytes::Bytes;

use crate::error::GatewayError;

/// Content type recorded when the client declares none.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A video payload received from a client, before it is stored.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    /// File name the client sent with the payload, if any.
    pub filename: Option<String>,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl VideoUpload {
    pub fn new(data: Bytes) -> Self {
        Self {
            filename: None,
            content_type: None,
            data,
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// The declared content type, or [`FALLBACK_CONTENT_TYPE`] when absent.
    pub fn effective_content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
    }

    /// Reject empty, oversized, or obviously non-video payloads.
    pub fn validate(&self, limit: u64) -> Result<(), GatewayError> {
        if self.data.is_empty() {
            return Err(GatewayError::InvalidUpload("video payload is empty".into()));
        }
        if self.size() > limit {
            return Err(GatewayError::UploadTooLarge {
                size: self.size(),
                limit,
            });
        }
        if !is_acceptable_content_type(self.content_type.as_deref()) {
            return Err(GatewayError::InvalidUpload(format!(
                "unsupported content type: {}",
                self.content_type.as_deref().unwrap_or_default()
            )));
        }
        Ok(())
    }
}

/// Loose content-type check: `video/*` or `application/octet-stream`.
///
/// An absent or blank type is accepted. Parameters such as `; codecs=...`
/// are ignored.
pub fn is_acceptable_content_type(content_type: Option<&str>) -> bool {
    let Some(raw) = content_type else {
        return true;
    };
    let essence = raw
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if essence.is_empty() || essence == FALLBACK_CONTENT_TYPE {
        return true;
    }
    essence
        .strip_prefix("video/")
        .is_some_and(|subtype| !subtype.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types() {
        assert!(is_acceptable_content_type(None));
        assert!(is_acceptable_content_type(Some("")));
        assert!(is_acceptable_content_type(Some("video/mp4")));
        assert!(is_acceptable_content_type(Some("Video/QuickTime")));
        assert!(is_acceptable_content_type(Some("video/webm; codecs=vp9")));
        assert!(is_acceptable_content_type(Some("application/octet-stream")));
        assert!(!is_acceptable_content_type(Some("video/")));
        assert!(!is_acceptable_content_type(Some("image/png")));
        assert!(!is_acceptable_content_type(Some("text/plain")));
    }

    #[test]
    fn empty_payload_rejected() {
        let upload = VideoUpload::new(Bytes::new());
        assert!(matches!(
            upload.validate(1024),
            Err(GatewayError::InvalidUpload(_))
        ));
    }

    #[test]
    fn oversize_payload_rejected() {
        let upload = VideoUpload::new(Bytes::from(vec![0u8; 11]));
        match upload.validate(10) {
            Err(GatewayError::UploadTooLarge { size, limit }) => {
                assert_eq!(size, 11);
                assert_eq!(limit, 10);
            }
            other => panic!("expected UploadTooLarge, got {other:?}"),
        }
        assert!(upload.validate(11).is_ok());
    }

    #[test]
    fn wrong_type_rejected() {
        let upload = VideoUpload::new(Bytes::from_static(b"png")).with_content_type("image/png");
        assert!(matches!(
            upload.validate(1024),
            Err(GatewayError::InvalidUpload(_))
        ));
    }

    #[test]
    fn effective_content_type_falls_back() {
        let bare = VideoUpload::new(Bytes::from_static(b"x"));
        assert_eq!(bare.effective_content_type(), FALLBACK_CONTENT_TYPE);
        let blank = bare.clone().with_content_type("  ");
        assert_eq!(blank.effective_content_type(), FALLBACK_CONTENT_TYPE);
        let mp4 = bare.with_content_type("video/mp4");
        assert_eq!(mp4.effective_content_type(), "video/mp4");
    }
}
