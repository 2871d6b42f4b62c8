use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AssetReceipt, UploadError};

/// Context for a batch upload (target entity, actor, request info)
#[derive(Debug, Clone)]
pub struct UploadCtx {
    /// Identifier of the domain entity the assets belong to.
    /// Carried through for correlation only - the pipeline never interprets it.
    pub entity_id: String,
    pub actor_id: Option<String>,
    pub request_id: String,
}

impl UploadCtx {
    pub fn new<S: Into<String>>(entity_id: S) -> Self {
        Self {
            entity_id: entity_id.into(),
            actor_id: None,
            request_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_actor<S: Into<String>>(mut self, actor_id: S) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn with_request_id<S: Into<String>>(mut self, request_id: S) -> Self {
        self.request_id = request_id.into();
        self
    }
}

/// One file submitted for upload: raw content plus the metadata the caller
/// declared for it. Constructed per request, discarded once the batch result
/// is returned.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub content: Bytes,
    pub filename: String,
    /// Declared media type, passed through to the store verbatim.
    /// Content is never sniffed.
    pub mime_type: String,
}

impl UploadRequest {
    pub fn new<B, S, T>(content: B, filename: S, mime_type: T) -> Self
    where
        B: Into<Bytes>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            content: content.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    /// Trailing dot-suffix of the original filename, taken verbatim.
    pub fn extension(&self) -> Option<&str> {
        filename_extension(&self.filename)
    }
}

/// Extension is whatever follows the last dot. No dot (or a trailing dot)
/// means no extension.
pub(crate) fn filename_extension(filename: &str) -> Option<&str> {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Name under which one object is stored, unique within the bucket namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey(pub String);

impl StorageKey {
    /// Create from existing string
    pub fn from_string(key: String) -> Self {
        Self(key)
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal outcome for one input file. Outcomes are order-correspondent with
/// the submitted batch.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    /// Written and addressable: the receipt carries the durable read URL
    Delivered(AssetReceipt),
    /// Permanently failed; no URL was produced for this file
    Failed(UploadError),
}

impl UploadOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }

    pub fn receipt(&self) -> Option<&AssetReceipt> {
        match self {
            Self::Delivered(receipt) => Some(receipt),
            Self::Failed(_) => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.receipt().map(|r| r.url.as_str())
    }

    pub fn error(&self) -> Option<&UploadError> {
        match self {
            Self::Delivered(_) => None,
            Self::Failed(error) => Some(error),
        }
    }
}

/// Ordered per-file outcomes for one batch. `result[i]` corresponds to
/// `batch[i]` regardless of which upload finished first.
///
/// The pipeline never fails a batch because some files failed; whether a
/// partial batch is acceptable is the caller's policy, and the accessors here
/// exist to make that decision cheap to express.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    outcomes: Vec<UploadOutcome>,
}

impl BatchResult {
    pub fn new(outcomes: Vec<UploadOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> &[UploadOutcome] {
        &self.outcomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UploadOutcome> {
        self.outcomes.iter()
    }

    /// Receipts of the files that made it, in input order
    pub fn delivered(&self) -> impl Iterator<Item = &AssetReceipt> {
        self.outcomes.iter().filter_map(UploadOutcome::receipt)
    }

    /// Errors of the files that did not, in input order
    pub fn failures(&self) -> impl Iterator<Item = &UploadError> {
        self.outcomes.iter().filter_map(UploadOutcome::error)
    }

    pub fn urls(&self) -> Vec<&str> {
        self.outcomes.iter().filter_map(UploadOutcome::url).collect()
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered().count()
    }

    pub fn fully_delivered(&self) -> bool {
        self.outcomes.iter().all(UploadOutcome::is_delivered)
    }
}

impl std::ops::Index<usize> for BatchResult {
    type Output = UploadOutcome;

    fn index(&self, index: usize) -> &Self::Output {
        &self.outcomes[index]
    }
}

impl IntoIterator for BatchResult {
    type Item = UploadOutcome;
    type IntoIter = std::vec::IntoIter<UploadOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a UploadOutcome;
    type IntoIter = std::slice::Iter<'a, UploadOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_trailing_dot_suffix() {
        assert_eq!(filename_extension("photo.jpg"), Some("jpg"));
        assert_eq!(filename_extension("archive.tar.gz"), Some("gz"));
        assert_eq!(filename_extension(".env"), Some("env"));
        assert_eq!(filename_extension("README"), None);
        assert_eq!(filename_extension("trailing."), None);
    }

    #[test]
    fn batch_result_accessors_follow_input_order() {
        let receipt = AssetReceipt {
            key: StorageKey::from_string("assets/a.jpg".to_string()),
            url: "memory://assets/a.jpg?expires=1".to_string(),
            filename: "a.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size_bytes: 3,
            etag: None,
            uploaded_at: 0,
            attempts: 1,
        };
        let error = UploadError::rejected("too large");
        let result = BatchResult::new(vec![
            UploadOutcome::Delivered(receipt.clone()),
            UploadOutcome::Failed(error),
            UploadOutcome::Delivered(receipt),
        ]);

        assert_eq!(result.len(), 3);
        assert!(!result.fully_delivered());
        assert_eq!(result.delivered_count(), 2);
        assert_eq!(result.urls().len(), 2);
        assert!(result[0].is_delivered());
        assert!(!result[1].is_delivered());
        assert_eq!(result.failures().count(), 1);
    }

    #[test]
    fn empty_batch_result_has_no_outcomes() {
        let result = BatchResult::empty();
        assert!(result.is_empty());
        assert!(result.fully_delivered());
        assert!(result.urls().is_empty());
    }
}
