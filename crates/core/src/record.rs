use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{RecordId, UserId};

/// Free-form location payload attached by mobile clients.
pub type Location = serde_json::Map<String, serde_json::Value>;

/// Highest accepted emotion score.
pub const MAX_EMOTION_SCORE: i64 = 10;

/// Render the ingestion time as an ISO-8601 string with microsecond precision.
#[must_use]
pub fn ingestion_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn require_user(user_id: &str) -> Result<UserId, CoreError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(CoreError::MissingField("user_id"));
    }
    Ok(UserId::new(trimmed))
}

/// A blank timestamp counts as absent and falls back to the ingestion time.
fn timestamp_or_now(timestamp: Option<String>, now: DateTime<Utc>) -> String {
    timestamp
        .filter(|ts| !ts.trim().is_empty())
        .unwrap_or_else(|| ingestion_timestamp(now))
}

fn check_duration(duration: Option<f64>) -> Result<Option<f64>, CoreError> {
    match duration {
        Some(d) if !d.is_finite() || d < 0.0 => Err(CoreError::InvalidField {
            field: "duration",
            reason: format!("must be a non-negative number of seconds, got {d}"),
        }),
        other => Ok(other),
    }
}

fn check_coordinate(field: &'static str, value: f64, bound: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value.abs() > bound {
        return Err(CoreError::InvalidField {
            field,
            reason: format!("must be within -{bound}..={bound}, got {value}"),
        });
    }
    Ok(())
}

/// A stored emotion-sentiment score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SentimentRecord {
    /// Identifier assigned by the record store.
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub user_id: UserId,
    /// Score between 0 and 10 inclusive.
    pub emotion_score: u8,
    /// ISO-8601 timestamp.
    pub timestamp: String,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub location: Option<Location>,
}

/// Client input for a new sentiment record.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewSentiment {
    pub user_id: String,
    pub emotion_score: i64,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub location: Option<Location>,
}

impl NewSentiment {
    /// Validate the input and build a record with an unassigned id.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<SentimentRecord, CoreError> {
        let user_id = require_user(&self.user_id)?;
        let emotion_score = u8::try_from(self.emotion_score)
            .ok()
            .filter(|score| i64::from(*score) <= MAX_EMOTION_SCORE)
            .ok_or_else(|| CoreError::InvalidField {
                field: "emotion_score",
                reason: format!(
                    "must be between 0 and {MAX_EMOTION_SCORE}, got {}",
                    self.emotion_score
                ),
            })?;

        Ok(SentimentRecord {
            id: RecordId::default(),
            user_id,
            emotion_score,
            timestamp: timestamp_or_now(self.timestamp, now),
            weather: self.weather,
            location: self.location,
        })
    }
}

/// A stored location fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GpsRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub user_id: UserId,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

/// Client input for a new location fix.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewGps {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl NewGps {
    /// Validate the input and build a record with an unassigned id.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<GpsRecord, CoreError> {
        let user_id = require_user(&self.user_id)?;
        check_coordinate("latitude", self.latitude, 90.0)?;
        check_coordinate("longitude", self.longitude, 180.0)?;

        Ok(GpsRecord {
            id: RecordId::default(),
            user_id,
            latitude: self.latitude,
            longitude: self.longitude,
            timestamp: timestamp_or_now(self.timestamp, now),
        })
    }
}

/// Stored metadata for a video log.
///
/// Documents written by older storage strategies carry only some of the
/// video fields, so every one of them is optional. Which of them resolves is
/// decided at read time by the reconciliation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VlogRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub user_id: UserId,
    /// Resolvable reference to the video. For uploads this is derived from
    /// `storage_key`; for legacy records it is the URL the client supplied.
    #[serde(default)]
    pub video_url: Option<String>,
    /// Opaque handle into the blob store.
    #[serde(default)]
    pub storage_key: Option<String>,
    /// Bare file name of a locally stored video.
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    /// Length of the clip in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    pub timestamp: String,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub location: Option<Location>,
}

/// Client input for a vlog that points at an already hosted video.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewVlog {
    pub user_id: String,
    pub video_url: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub location: Option<Location>,
}

impl NewVlog {
    /// Validate the input and build a record with an unassigned id.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<VlogRecord, CoreError> {
        let user_id = require_user(&self.user_id)?;
        let video_url = self.video_url.trim();
        if video_url.is_empty() {
            return Err(CoreError::MissingField("video_url"));
        }

        Ok(VlogRecord {
            id: RecordId::default(),
            user_id,
            video_url: Some(video_url.to_owned()),
            storage_key: None,
            filename: None,
            content_type: None,
            size_bytes: None,
            duration: check_duration(self.duration)?,
            timestamp: timestamp_or_now(self.timestamp, now),
            location: self.location,
        })
    }
}

/// Descriptive fields sent alongside an uploaded video.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VlogUploadMeta {
    pub user_id: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl VlogUploadMeta {
    /// Validate the descriptive fields and build a record pointing at a
    /// stored blob. The id is left unassigned.
    pub fn into_record(
        self,
        now: DateTime<Utc>,
        storage_key: String,
        reference: String,
        content_type: String,
        size_bytes: u64,
    ) -> Result<VlogRecord, CoreError> {
        let user_id = require_user(&self.user_id)?;

        Ok(VlogRecord {
            id: RecordId::default(),
            user_id,
            video_url: Some(reference),
            filename: Some(storage_key.clone()),
            storage_key: Some(storage_key),
            content_type: Some(content_type),
            size_bytes: Some(size_bytes),
            duration: check_duration(self.duration)?,
            timestamp: timestamp_or_now(self.timestamp, now),
            location: self.location,
        })
    }

    /// Check the descriptive fields without consuming them, so a bad request
    /// is rejected before any bytes are stored.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_user(&self.user_id)?;
        check_duration(self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    fn sentiment(score: i64) -> NewSentiment {
        NewSentiment {
            user_id: "u1".into(),
            emotion_score: score,
            timestamp: None,
            weather: Some("sunny".into()),
            location: None,
        }
    }

    #[test]
    fn sentiment_defaults_timestamp_to_ingestion_time() {
        let record = sentiment(7).into_record(fixed_now()).unwrap();
        assert_eq!(record.timestamp, "2025-03-14T09:26:53.000000Z");
        assert_eq!(record.emotion_score, 7);
        assert!(record.id.is_empty());
    }

    #[test]
    fn sentiment_keeps_client_timestamp() {
        let mut input = sentiment(3);
        input.timestamp = Some("2024-12-01T10:00:00".into());
        let record = input.into_record(fixed_now()).unwrap();
        assert_eq!(record.timestamp, "2024-12-01T10:00:00");
    }

    #[test]
    fn blank_timestamp_counts_as_absent() {
        let mut input = sentiment(3);
        input.timestamp = Some("   ".into());
        let record = input.into_record(fixed_now()).unwrap();
        assert_eq!(record.timestamp, ingestion_timestamp(fixed_now()));
    }

    #[test]
    fn sentiment_score_bounds() {
        assert!(sentiment(0).into_record(fixed_now()).is_ok());
        assert!(sentiment(10).into_record(fixed_now()).is_ok());
        assert!(matches!(
            sentiment(11).into_record(fixed_now()),
            Err(CoreError::InvalidField {
                field: "emotion_score",
                ..
            })
        ));
        assert!(sentiment(-1).into_record(fixed_now()).is_err());
    }

    #[test]
    fn blank_user_is_rejected() {
        let mut input = sentiment(5);
        input.user_id = "  ".into();
        assert_eq!(
            input.into_record(fixed_now()),
            Err(CoreError::MissingField("user_id"))
        );
    }

    #[test]
    fn gps_rejects_out_of_range_coordinates() {
        let input = NewGps {
            user_id: "u1".into(),
            latitude: 91.0,
            longitude: 0.0,
            timestamp: None,
        };
        assert!(input.into_record(fixed_now()).is_err());

        let input = NewGps {
            user_id: "u1".into(),
            latitude: 25.03,
            longitude: f64::NAN,
            timestamp: None,
        };
        assert!(input.into_record(fixed_now()).is_err());

        let input = NewGps {
            user_id: "u1".into(),
            latitude: 25.03,
            longitude: 121.56,
            timestamp: None,
        };
        let record = input.into_record(fixed_now()).unwrap();
        assert!((record.latitude - 25.03).abs() < f64::EPSILON);
    }

    #[test]
    fn legacy_vlog_requires_url() {
        let input = NewVlog {
            user_id: "u1".into(),
            video_url: String::new(),
            duration: None,
            timestamp: None,
            location: None,
        };
        assert_eq!(
            input.into_record(fixed_now()),
            Err(CoreError::MissingField("video_url"))
        );
    }

    #[test]
    fn negative_duration_is_rejected() {
        let meta = VlogUploadMeta {
            user_id: "u1".into(),
            duration: Some(-2.0),
            ..VlogUploadMeta::default()
        };
        assert!(meta.validate().is_err());
    }

    #[test]
    fn upload_record_points_at_storage_key() {
        let meta = VlogUploadMeta {
            user_id: "u1".into(),
            duration: Some(12.5),
            ..VlogUploadMeta::default()
        };
        let record = meta
            .into_record(
                fixed_now(),
                "u1_1_abcd".into(),
                "http://localhost/videos/u1_1_abcd".into(),
                "video/mp4".into(),
                1024,
            )
            .unwrap();
        assert_eq!(record.storage_key.as_deref(), Some("u1_1_abcd"));
        assert_eq!(record.filename.as_deref(), Some("u1_1_abcd"));
        assert_eq!(
            record.video_url.as_deref(),
            Some("http://localhost/videos/u1_1_abcd")
        );
        assert_eq!(record.size_bytes, Some(1024));
    }

    #[test]
    fn vlog_decodes_from_sparse_legacy_document() {
        let json = serde_json::json!({
            "_id": "abc",
            "user_id": "u1",
            "video_url": "https://cdn.example.com/v.mp4",
            "timestamp": "2024-01-01T00:00:00",
        });
        let record: VlogRecord = serde_json::from_value(json).unwrap();
        assert!(record.storage_key.is_none());
        assert!(record.filename.is_none());
        assert_eq!(record.id.as_str(), "abc");
    }
}
