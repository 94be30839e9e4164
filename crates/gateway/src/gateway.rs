use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use emogo_blob::{BlobError, BlobStore, ResolvedBlob};
use emogo_core::{
    Collection, GpsRecord, NewGps, NewSentiment, NewVlog, RecordId, SentimentRecord, VlogRecord,
    VlogUploadMeta,
};
use emogo_records::{Document, RecordStore, encode};

use crate::error::GatewayError;
use crate::metrics::GatewayMetrics;
use crate::reconcile::{self, VlogResolution, video_reference};
use crate::upload::VideoUpload;

/// Blob existence checks in flight at once while listing vlogs.
pub const LIST_BLOB_CHECKS_IN_FLIGHT: usize = 16;

/// File name recorded for uploads that arrive without one.
const DEFAULT_UPLOAD_FILENAME: &str = "upload";

/// The ingestion facade.
///
/// Owns the record store and blob store, writes the three record kinds, and
/// reconciles vlog metadata with the blob store on every read so that no
/// returned vlog points at a missing video.
pub struct Gateway {
    pub(crate) records: Arc<dyn RecordStore>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) public_base_url: String,
    pub(crate) list_limit: usize,
    pub(crate) max_upload_bytes: u64,
    pub(crate) metrics: Arc<GatewayMetrics>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("records", &self.records.backend_name())
            .field("blobs", &self.blobs.backend_name())
            .field("public_base_url", &self.public_base_url)
            .field("list_limit", &self.list_limit)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Return a reference to the gateway metrics.
    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    pub fn list_limit(&self) -> usize {
        self.list_limit
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    pub fn record_backend(&self) -> &'static str {
        self.records.backend_name()
    }

    pub fn blob_backend(&self) -> &'static str {
        self.blobs.backend_name()
    }

    /// Persist a typed record and return the id the store assigned.
    async fn insert<T: Serialize>(
        &self,
        collection: Collection,
        record: &T,
    ) -> Result<RecordId, GatewayError> {
        let body = encode(record)?;
        let doc = self.records.insert(collection, body).await?;
        Ok(RecordId::new(doc.id))
    }

    /// Fetch up to `list_limit` documents and decode them, skipping any that
    /// no longer match the record shape.
    async fn list_decoded<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, GatewayError> {
        let docs = self.records.list(collection, self.list_limit).await?;
        Ok(docs
            .iter()
            .filter_map(|doc| self.decode(collection, doc))
            .collect())
    }

    fn decode<T: DeserializeOwned>(&self, collection: Collection, doc: &Document) -> Option<T> {
        match doc.decode() {
            Ok(record) => Some(record),
            Err(e) => {
                self.metrics.increment_decode_failures();
                warn!(%collection, id = %doc.id, error = %e, "skipping undecodable document");
                None
            }
        }
    }

    /// Validate and store a sentiment score.
    #[instrument(name = "gateway.create_sentiment", skip_all, fields(user_id = %input.user_id))]
    pub async fn create_sentiment(
        &self,
        input: NewSentiment,
    ) -> Result<SentimentRecord, GatewayError> {
        let mut record = input.into_record(Utc::now())?;
        record.id = self.insert(Collection::Sentiments, &record).await?;
        self.metrics.increment_sentiments_created();
        debug!(id = %record.id, "sentiment stored");
        Ok(record)
    }

    /// List sentiments in insertion order.
    #[instrument(name = "gateway.list_sentiments", skip_all)]
    pub async fn list_sentiments(&self) -> Result<Vec<SentimentRecord>, GatewayError> {
        self.list_decoded(Collection::Sentiments).await
    }

    /// Validate and store a GPS fix.
    #[instrument(name = "gateway.create_gps", skip_all, fields(user_id = %input.user_id))]
    pub async fn create_gps(&self, input: NewGps) -> Result<GpsRecord, GatewayError> {
        let mut record = input.into_record(Utc::now())?;
        record.id = self.insert(Collection::Gps, &record).await?;
        self.metrics.increment_gps_created();
        debug!(id = %record.id, "gps fix stored");
        Ok(record)
    }

    /// List GPS fixes in insertion order.
    #[instrument(name = "gateway.list_gps", skip_all)]
    pub async fn list_gps(&self) -> Result<Vec<GpsRecord>, GatewayError> {
        self.list_decoded(Collection::Gps).await
    }

    /// Store an uploaded video and record its metadata.
    ///
    /// The blob is written first and the record second, with nothing tying
    /// the two together: a failed record write leaves an orphaned blob, which
    /// listings never see.
    #[instrument(
        name = "gateway.create_vlog",
        skip_all,
        fields(user_id = %meta.user_id, size = upload.size())
    )]
    pub async fn create_vlog(
        &self,
        upload: VideoUpload,
        meta: VlogUploadMeta,
    ) -> Result<VlogRecord, GatewayError> {
        let checked = meta
            .validate()
            .map_err(GatewayError::from)
            .and_then(|()| upload.validate(self.max_upload_bytes));
        if let Err(e) = checked {
            self.metrics.increment_uploads_rejected();
            return Err(e);
        }

        let content_type = upload.effective_content_type().to_owned();
        let filename = upload
            .filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_UPLOAD_FILENAME);

        let stored = self
            .blobs
            .put(meta.user_id.trim(), filename, &content_type, upload.data.clone())
            .await
            .map_err(|e| match e {
                BlobError::TooLarge { size, limit } => {
                    self.metrics.increment_uploads_rejected();
                    GatewayError::UploadTooLarge { size, limit }
                }
                other => other.into(),
            })?;
        self.metrics.increment_uploads_stored();

        let reference = video_reference(&self.public_base_url, &stored.key);
        let mut record = meta.into_record(
            Utc::now(),
            stored.key.clone(),
            reference,
            content_type,
            stored.size_bytes,
        )?;
        record.id = self.insert(Collection::Vlogs, &record).await?;
        self.metrics.increment_vlogs_created();

        info!(id = %record.id, key = %stored.key, "vlog uploaded");
        Ok(record)
    }

    /// Record a vlog whose video is hosted elsewhere. No blob is written.
    #[instrument(name = "gateway.create_vlog_from_url", skip_all, fields(user_id = %input.user_id))]
    pub async fn create_vlog_from_url(&self, input: NewVlog) -> Result<VlogRecord, GatewayError> {
        let mut record = input.into_record(Utc::now())?;
        record.id = self.insert(Collection::Vlogs, &record).await?;
        self.metrics.increment_vlogs_created();
        debug!(id = %record.id, "vlog stored with external url");
        Ok(record)
    }

    /// List vlogs whose video currently resolves, in insertion order.
    ///
    /// Unresolvable records are hidden. A blob store fault while probing one
    /// record hides that record only; the listing still succeeds. Checks run
    /// [`LIST_BLOB_CHECKS_IN_FLIGHT`] at a time and results keep storage order.
    #[instrument(name = "gateway.list_vlogs", skip_all)]
    pub async fn list_vlogs(&self) -> Result<Vec<VlogRecord>, GatewayError> {
        let stored: Vec<VlogRecord> = self.list_decoded(Collection::Vlogs).await?;
        let checked: Vec<_> = stream::iter(stored)
            .map(|record| async move {
                let resolution = reconcile::resolve(&record, self.blobs.as_ref()).await;
                (record, resolution)
            })
            .buffered(LIST_BLOB_CHECKS_IN_FLIGHT)
            .collect()
            .await;

        let mut visible = Vec::with_capacity(checked.len());
        for (record, resolution) in checked {
            let resolution = match resolution {
                Ok(resolution) => resolution,
                Err(e) => {
                    self.metrics.increment_blob_faults();
                    warn!(id = %record.id, error = %e, "blob probe failed, skipping vlog");
                    continue;
                }
            };
            let id = record.id.clone();
            match reconcile::apply(record, &resolution, &self.public_base_url) {
                Some(record) => visible.push(record),
                None => {
                    self.metrics.increment_vlogs_hidden();
                    debug!(%id, "hiding unresolvable vlog");
                }
            }
        }

        Ok(visible)
    }

    /// Fetch one vlog by id, reconciled the same way as listings.
    ///
    /// Unlike listings, a blob store fault fails the request.
    #[instrument(name = "gateway.get_vlog", skip(self))]
    pub async fn get_vlog(&self, id: &str) -> Result<VlogRecord, GatewayError> {
        let doc = self
            .records
            .get(Collection::Vlogs, id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(format!("vlog {id}")))?;
        let record: VlogRecord = doc.decode()?;

        let resolution = reconcile::resolve(&record, self.blobs.as_ref()).await?;
        if resolution == VlogResolution::Unresolvable {
            self.metrics.increment_vlogs_hidden();
        }
        reconcile::apply(record, &resolution, &self.public_base_url)
            .ok_or_else(|| GatewayError::NotFound(format!("vlog {id}")))
    }

    /// Retrieve a stored video by key.
    #[instrument(name = "gateway.fetch_video", skip(self))]
    pub async fn fetch_video(&self, key: &str) -> Result<ResolvedBlob, GatewayError> {
        match self.blobs.get(key).await {
            Ok(blob) => {
                self.metrics.increment_videos_served();
                Ok(blob)
            }
            Err(BlobError::NotFound(_) | BlobError::InvalidKey(_)) => {
                Err(GatewayError::NotFound(format!("video {key}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Close the record store and release its connections.
    pub async fn shutdown(&self) {
        self.records.close().await;
        info!("gateway shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;
    use emogo_blob::{BlobMetadata, UrlPassthroughBlobStore};
    use emogo_blob_memory::MemoryBlobStore;
    use emogo_records_memory::MemoryRecordStore;
    use serde_json::{Value, json};

    use super::*;
    use crate::builder::GatewayBuilder;

    const BASE: &str = "http://emogo.test";

    struct Harness {
        gateway: Gateway,
        records: Arc<MemoryRecordStore>,
        blobs: Arc<MemoryBlobStore>,
    }

    fn harness_with_limit(max_upload_bytes: u64) -> Harness {
        let records = Arc::new(MemoryRecordStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let gateway = GatewayBuilder::new()
            .records(Arc::clone(&records) as Arc<dyn RecordStore>)
            .blobs(Arc::clone(&blobs) as Arc<dyn BlobStore>)
            .public_base_url(BASE)
            .max_upload_bytes(max_upload_bytes)
            .build()
            .unwrap();
        Harness {
            gateway,
            records,
            blobs,
        }
    }

    fn harness() -> Harness {
        harness_with_limit(emogo_blob::DEFAULT_MAX_BLOB_BYTES)
    }

    fn meta(user: &str) -> VlogUploadMeta {
        VlogUploadMeta {
            user_id: user.into(),
            duration: Some(3.5),
            ..VlogUploadMeta::default()
        }
    }

    fn video(len: usize) -> VideoUpload {
        VideoUpload::new(Bytes::from(vec![7u8; len]))
            .with_filename("clip.mp4")
            .with_content_type("video/mp4")
    }

    fn json_map(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn upload_then_list_returns_resolvable_record() {
        let h = harness();
        let created = h.gateway.create_vlog(video(1024), meta("u1")).await.unwrap();

        let key = created.storage_key.clone().unwrap();
        let reference = created.video_url.clone().unwrap();
        assert!(!reference.is_empty());
        assert_eq!(reference, format!("{BASE}/videos/{key}"));
        assert_eq!(created.filename.as_deref(), Some(key.as_str()));
        assert_eq!(created.size_bytes, Some(1024));
        assert_eq!(created.content_type.as_deref(), Some("video/mp4"));
        assert!(!created.id.is_empty());
        assert!(h.blobs.exists(&key).await.unwrap());

        let listed = h.gateway.list_vlogs().await.unwrap();
        assert_eq!(listed, vec![created]);

        let blob = h.gateway.fetch_video(&key).await.unwrap();
        assert_eq!(blob.data.len(), 1024);
        assert_eq!(blob.metadata.owner, "u1");
    }

    #[tokio::test]
    async fn oversize_upload_creates_nothing() {
        let h = harness_with_limit(512);
        let err = h.gateway.create_vlog(video(513), meta("u1")).await.unwrap_err();
        assert!(matches!(err, GatewayError::UploadTooLarge { size: 513, limit: 512 }));
        assert!(h.blobs.is_empty());
        assert_eq!(h.records.count(Collection::Vlogs), 0);
        assert_eq!(h.gateway.metrics().snapshot().uploads_rejected, 1);
    }

    #[tokio::test]
    async fn blob_store_limit_is_enforced_too() {
        let records = Arc::new(MemoryRecordStore::new());
        let blobs = Arc::new(MemoryBlobStore::with_max_blob_bytes(100));
        let gateway = GatewayBuilder::new()
            .records(Arc::clone(&records) as Arc<dyn RecordStore>)
            .blobs(blobs as Arc<dyn BlobStore>)
            .build()
            .unwrap();
        let err = gateway.create_vlog(video(101), meta("u1")).await.unwrap_err();
        assert!(matches!(err, GatewayError::UploadTooLarge { .. }));
        assert_eq!(records.count(Collection::Vlogs), 0);
    }

    #[tokio::test]
    async fn invalid_metadata_stores_no_blob() {
        let h = harness();
        let err = h.gateway.create_vlog(video(10), meta("  ")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert!(h.blobs.is_empty());

        let err = h
            .gateway
            .create_vlog(video(10).with_content_type("text/html"), meta("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidUpload(_)));
        assert!(h.blobs.is_empty());
    }

    #[tokio::test]
    async fn drift_hides_only_the_affected_record() {
        let h = harness();
        let first = h.gateway.create_vlog(video(8), meta("u1")).await.unwrap();
        let second = h.gateway.create_vlog(video(8), meta("u2")).await.unwrap();
        let third = h.gateway.create_vlog(video(8), meta("u3")).await.unwrap();

        assert!(h.blobs.remove(second.storage_key.as_deref().unwrap()));

        let listed = h.gateway.list_vlogs().await.unwrap();
        assert_eq!(listed, vec![first, third]);
        assert_eq!(h.gateway.metrics().snapshot().vlogs_hidden, 1);

        let err = h.gateway.get_vlog(second.id.as_str()).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
    }

    #[tokio::test]
    async fn legacy_and_filename_records_are_reconciled() {
        let h = harness();
        let legacy = h
            .gateway
            .create_vlog_from_url(NewVlog {
                user_id: "u1".into(),
                video_url: "https://cdn.example.com/v.mp4".into(),
                duration: None,
                timestamp: None,
                location: None,
            })
            .await
            .unwrap();

        let stored = h
            .blobs
            .put("u2", "old.mp4", "video/mp4", Bytes::from_static(b"old"))
            .await
            .unwrap();
        h.records
            .insert(
                Collection::Vlogs,
                json_map(json!({
                    "user_id": "u2",
                    "video_url": format!("/uploads/{}", stored.key),
                    "timestamp": "2024-05-01T10:00:00Z",
                })),
            )
            .await
            .unwrap();
        h.records
            .insert(
                Collection::Vlogs,
                json_map(json!({
                    "user_id": "u3",
                    "filename": "lost.mp4",
                    "timestamp": "2024-05-01T10:00:00Z",
                })),
            )
            .await
            .unwrap();

        let listed = h.gateway.list_vlogs().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], legacy);
        assert_eq!(
            listed[1].video_url.as_deref(),
            Some(format!("{BASE}/videos/{}", stored.key).as_str())
        );
    }

    #[tokio::test]
    async fn undecodable_documents_are_skipped() {
        let h = harness();
        h.records
            .insert(Collection::Sentiments, json_map(json!({"garbage": true})))
            .await
            .unwrap();
        let good = h
            .gateway
            .create_sentiment(NewSentiment {
                user_id: "u1".into(),
                emotion_score: 4,
                timestamp: None,
                weather: None,
                location: None,
            })
            .await
            .unwrap();

        let listed = h.gateway.list_sentiments().await.unwrap();
        assert_eq!(listed, vec![good]);
        assert_eq!(h.gateway.metrics().snapshot().decode_failures, 1);
    }

    #[tokio::test]
    async fn sentiments_and_gps_get_ids_and_timestamps() {
        let h = harness();
        let a = h
            .gateway
            .create_sentiment(NewSentiment {
                user_id: "u1".into(),
                emotion_score: 7,
                timestamp: None,
                weather: Some("rain".into()),
                location: None,
            })
            .await
            .unwrap();
        let b = h
            .gateway
            .create_sentiment(NewSentiment {
                user_id: "u1".into(),
                emotion_score: 0,
                timestamp: Some("2024-01-01T00:00:00Z".into()),
                weather: None,
                location: None,
            })
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
        assert!(!a.timestamp.is_empty());
        assert_eq!(b.timestamp, "2024-01-01T00:00:00Z");

        let fix = h
            .gateway
            .create_gps(NewGps {
                user_id: "u1".into(),
                latitude: 25.03,
                longitude: 121.56,
                timestamp: None,
            })
            .await
            .unwrap();
        assert!(!fix.timestamp.is_empty());

        assert_eq!(h.gateway.list_sentiments().await.unwrap(), vec![a, b]);
        assert_eq!(h.gateway.list_gps().await.unwrap(), vec![fix]);
        let snap = h.gateway.metrics().snapshot();
        assert_eq!(snap.sentiments_created, 2);
        assert_eq!(snap.gps_created, 1);
    }

    #[tokio::test]
    async fn invalid_sentiment_is_rejected() {
        let h = harness();
        let err = h
            .gateway
            .create_sentiment(NewSentiment {
                user_id: "u1".into(),
                emotion_score: 11,
                timestamp: None,
                weather: None,
                location: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(h.records.count(Collection::Sentiments), 0);
    }

    #[tokio::test]
    async fn listing_is_capped() {
        let records = Arc::new(MemoryRecordStore::new());
        let gateway = GatewayBuilder::new()
            .records(records as Arc<dyn RecordStore>)
            .blobs(Arc::new(MemoryBlobStore::new()))
            .list_limit(2)
            .build()
            .unwrap();
        for lat in [1.0, 2.0, 3.0] {
            gateway
                .create_gps(NewGps {
                    user_id: "u1".into(),
                    latitude: lat,
                    longitude: 0.0,
                    timestamp: None,
                })
                .await
                .unwrap();
        }
        let listed = gateway.list_gps().await.unwrap();
        let lats: Vec<f64> = listed.iter().map(|g| g.latitude).collect();
        assert_eq!(lats, vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn missing_vlog_and_video_are_not_found() {
        let h = harness();
        assert!(matches!(
            h.gateway.get_vlog("nope").await,
            Err(GatewayError::NotFound(_))
        ));
        assert!(matches!(
            h.gateway.fetch_video("nope_20250101T000000000000_00000000").await,
            Err(GatewayError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn passthrough_rejects_uploads_but_lists_urls() {
        let gateway = GatewayBuilder::new()
            .records(Arc::new(MemoryRecordStore::new()))
            .blobs(Arc::new(UrlPassthroughBlobStore::new()))
            .build()
            .unwrap();
        let err = gateway.create_vlog(video(16), meta("u1")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Blob(BlobError::Unsupported(_))));

        gateway
            .create_vlog_from_url(NewVlog {
                user_id: "u1".into(),
                video_url: "http://example.com/a.mp4".into(),
                duration: Some(1.0),
                timestamp: None,
                location: None,
            })
            .await
            .unwrap();
        assert_eq!(gateway.list_vlogs().await.unwrap().len(), 1);
    }

    /// Blob store whose probes fail for one poisoned key.
    struct FlakyBlobStore {
        inner: MemoryBlobStore,
        poisoned: std::sync::Mutex<Option<String>>,
        probes: AtomicUsize,
    }

    #[async_trait]
    impl BlobStore for FlakyBlobStore {
        fn backend_name(&self) -> &'static str {
            "flaky"
        }

        fn max_blob_bytes(&self) -> u64 {
            self.inner.max_blob_bytes()
        }

        async fn put(
            &self,
            owner: &str,
            filename: &str,
            content_type: &str,
            data: Bytes,
        ) -> Result<BlobMetadata, BlobError> {
            self.inner.put(owner, filename, content_type, data).await
        }

        async fn get(&self, key: &str) -> Result<ResolvedBlob, BlobError> {
            self.inner.get(key).await
        }

        async fn exists(&self, key: &str) -> Result<bool, BlobError> {
            self.probes.fetch_add(1, Ordering::Relaxed);
            let poisoned = self.poisoned.lock().unwrap().as_deref() == Some(key);
            if poisoned {
                return Err(BlobError::Storage("connection reset".into()));
            }
            self.inner.exists(key).await
        }
    }

    #[tokio::test]
    async fn blob_fault_skips_record_in_listing_but_fails_get() {
        let blobs = Arc::new(FlakyBlobStore {
            inner: MemoryBlobStore::new(),
            poisoned: std::sync::Mutex::new(None),
            probes: AtomicUsize::new(0),
        });
        let gateway = GatewayBuilder::new()
            .records(Arc::new(MemoryRecordStore::new()))
            .blobs(Arc::clone(&blobs) as Arc<dyn BlobStore>)
            .build()
            .unwrap();

        let ok = gateway.create_vlog(video(4), meta("u1")).await.unwrap();
        let bad = gateway.create_vlog(video(4), meta("u2")).await.unwrap();
        *blobs.poisoned.lock().unwrap() = bad.storage_key.clone();

        let listed = gateway.list_vlogs().await.unwrap();
        assert_eq!(listed, vec![ok]);
        assert_eq!(blobs.probes.load(Ordering::Relaxed), 2);
        assert_eq!(gateway.metrics().snapshot().blob_faults, 1);

        let err = gateway.get_vlog(bad.id.as_str()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Blob(BlobError::Storage(_))));
    }

    #[tokio::test]
    async fn concurrent_uploads_all_listed() {
        let h = harness();
        let gateway = Arc::new(h.gateway);
        let uploads = (0..8).map(|i| {
            let gateway = Arc::clone(&gateway);
            async move { gateway.create_vlog(video(32), meta(&format!("u{i}"))).await }
        });
        let created = futures::future::join_all(uploads).await;
        assert!(created.iter().all(Result::is_ok));
        assert_eq!(gateway.list_vlogs().await.unwrap().len(), 8);
        assert_eq!(h.blobs.len(), 8);
    }

    /// Answers `exists` slower for earlier callers so checks finish out of
    /// order, and records how many ran at once.
    struct SlowBlobStore {
        inner: MemoryBlobStore,
        started: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl BlobStore for SlowBlobStore {
        fn backend_name(&self) -> &'static str {
            "slow"
        }

        fn max_blob_bytes(&self) -> u64 {
            self.inner.max_blob_bytes()
        }

        async fn put(
            &self,
            owner: &str,
            filename: &str,
            content_type: &str,
            data: Bytes,
        ) -> Result<BlobMetadata, BlobError> {
            self.inner.put(owner, filename, content_type, data).await
        }

        async fn get(&self, key: &str) -> Result<ResolvedBlob, BlobError> {
            self.inner.get(key).await
        }

        async fn exists(&self, key: &str) -> Result<bool, BlobError> {
            let nth = self.started.fetch_add(1, Ordering::SeqCst) as u64;
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(40u64.saturating_sub(nth))).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.inner.exists(key).await
        }
    }

    #[tokio::test]
    async fn listing_checks_blobs_concurrently_and_keeps_order() {
        let blobs = Arc::new(SlowBlobStore {
            inner: MemoryBlobStore::new(),
            started: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let gateway = GatewayBuilder::new()
            .records(Arc::new(MemoryRecordStore::new()))
            .blobs(Arc::clone(&blobs) as Arc<dyn BlobStore>)
            .build()
            .unwrap();

        let mut created = Vec::new();
        for i in 0..(LIST_BLOB_CHECKS_IN_FLIGHT + 8) {
            let record = gateway
                .create_vlog(video(4), meta(&format!("u{i}")))
                .await
                .unwrap();
            created.push(record.id);
        }

        let listed: Vec<_> = gateway
            .list_vlogs()
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(listed, created);

        let peak = blobs.peak.load(Ordering::SeqCst);
        assert!(peak > 1, "blob checks ran one at a time");
        assert!(peak <= LIST_BLOB_CHECKS_IN_FLIGHT);
    }
}
