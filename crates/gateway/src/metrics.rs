use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Atomic counters tracking ingestion and reconciliation outcomes.
///
/// All counters use relaxed ordering. For a consistent point-in-time view,
/// call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    /// Sentiment records created.
    pub sentiments_created: AtomicU64,
    /// GPS records created.
    pub gps_created: AtomicU64,
    /// Vlog records created (uploads and legacy URLs).
    pub vlogs_created: AtomicU64,
    /// Video payloads written to the blob store.
    pub uploads_stored: AtomicU64,
    /// Uploads refused before reaching the blob store.
    pub uploads_rejected: AtomicU64,
    /// Vlog records hidden from a listing because they did not resolve.
    pub vlogs_hidden: AtomicU64,
    /// Blob store faults met while resolving vlog records.
    pub blob_faults: AtomicU64,
    /// Stored documents that could not be decoded.
    pub decode_failures: AtomicU64,
    /// Video payloads served by key.
    pub videos_served: AtomicU64,
}

impl GatewayMetrics {
    /// Increment the sentiments-created counter.
    pub fn increment_sentiments_created(&self) {
        self.sentiments_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the gps-created counter.
    pub fn increment_gps_created(&self) {
        self.gps_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the vlogs-created counter.
    pub fn increment_vlogs_created(&self) {
        self.vlogs_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the uploads-stored counter.
    pub fn increment_uploads_stored(&self) {
        self.uploads_stored.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the uploads-rejected counter.
    pub fn increment_uploads_rejected(&self) {
        self.uploads_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the vlogs-hidden counter.
    pub fn increment_vlogs_hidden(&self) {
        self.vlogs_hidden.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the blob-faults counter.
    pub fn increment_blob_faults(&self) {
        self.blob_faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the decode-failures counter.
    pub fn increment_decode_failures(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the videos-served counter.
    pub fn increment_videos_served(&self) {
        self.videos_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a consistent point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sentiments_created: self.sentiments_created.load(Ordering::Relaxed),
            gps_created: self.gps_created.load(Ordering::Relaxed),
            vlogs_created: self.vlogs_created.load(Ordering::Relaxed),
            uploads_stored: self.uploads_stored.load(Ordering::Relaxed),
            uploads_rejected: self.uploads_rejected.load(Ordering::Relaxed),
            vlogs_hidden: self.vlogs_hidden.load(Ordering::Relaxed),
            blob_faults: self.blob_faults.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            videos_served: self.videos_served.load(Ordering::Relaxed),
        }
    }
}

/// A plain data snapshot of [`GatewayMetrics`] at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub sentiments_created: u64,
    pub gps_created: u64,
    pub vlogs_created: u64,
    pub uploads_stored: u64,
    pub uploads_rejected: u64,
    pub vlogs_hidden: u64,
    pub blob_faults: u64,
    pub decode_failures: u64,
    pub videos_served: u64,
}
