//! Read-time reconciliation of vlog records against the blob store.
//!
//! A stored vlog may reference its video in one of three ways, depending on
//! which storage strategy wrote it. Resolution inspects the fields in a fixed
//! priority order and asks the blob store to confirm local references. Only
//! records that resolve are ever returned to clients.

use emogo_blob::{BlobError, BlobStore, is_absolute_url};
use emogo_core::VlogRecord;

/// How a vlog record's video reference resolved at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VlogResolution {
    /// `storage_key` is set and the blob store holds it.
    HasStorageKey(String),
    /// No storage key; `video_url` is an absolute `http(s)` URL.
    HasLegacyUrl(String),
    /// No storage key or absolute URL; a bare file name the blob store holds.
    HasFilenameOnly(String),
    /// Nothing resolves. The record is hidden.
    Unresolvable,
}

impl VlogResolution {
    /// The client-facing reference for a resolved record.
    pub fn reference(&self, public_base_url: &str) -> Option<String> {
        match self {
            Self::HasStorageKey(key) | Self::HasFilenameOnly(key) => {
                Some(video_reference(public_base_url, key))
            }
            Self::HasLegacyUrl(url) => Some(url.clone()),
            Self::Unresolvable => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolvable)
    }
}

/// Build the reference under which the video endpoint serves `key`.
pub fn video_reference(public_base_url: &str, key: &str) -> String {
    format!("{}/videos/{key}", public_base_url.trim_end_matches('/'))
}

/// Last path segment of a `video_url` that is not an absolute URL.
fn local_file_name(video_url: &str) -> Option<&str> {
    if is_absolute_url(video_url) {
        return None;
    }
    video_url
        .rsplit('/')
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Compute the resolution for `record`.
///
/// A record carrying a storage key is judged on that key alone: its stored
/// `video_url` is a derived reference and never counts as a legacy URL, and
/// `filename` is not tried either, because for uploads it repeats the key.
///
/// # Errors
///
/// Returns the blob store's error when a probe fails. Callers decide whether
/// that hides the record or fails the request.
pub async fn resolve(
    record: &VlogRecord,
    blobs: &dyn BlobStore,
) -> Result<VlogResolution, BlobError> {
    if let Some(key) = non_empty(record.storage_key.as_ref()) {
        return Ok(if blobs.exists(key).await? {
            VlogResolution::HasStorageKey(key.to_owned())
        } else {
            VlogResolution::Unresolvable
        });
    }

    let video_url = non_empty(record.video_url.as_ref());
    if let Some(url) = video_url.filter(|url| is_absolute_url(url)) {
        return Ok(VlogResolution::HasLegacyUrl(url.to_owned()));
    }

    let candidates = [
        non_empty(record.filename.as_ref()),
        video_url.and_then(local_file_name),
    ];
    for name in candidates.into_iter().flatten() {
        if blobs.exists(name).await? {
            return Ok(VlogResolution::HasFilenameOnly(name.to_owned()));
        }
    }

    Ok(VlogResolution::Unresolvable)
}

/// Replace the stored `video_url` with the validated reference.
///
/// Returns `None` for unresolvable records.
pub fn apply(
    mut record: VlogRecord,
    resolution: &VlogResolution,
    public_base_url: &str,
) -> Option<VlogRecord> {
    record.video_url = Some(resolution.reference(public_base_url)?);
    Some(record)
}
