use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use parking_lot::RwLock;

use crate::{AssetStore, PutReceipt, StorageKey, StoreError, StoreResult};

#[derive(Debug, Clone)]
struct StoredObject {
    content: Bytes,
    content_type: String,
}

/// In-memory store for testing and development.
///
/// Signed URLs use a `memory://` scheme with the expiry embedded as a query
/// parameter; `resolve_url` dereferences one back to the stored bytes.
#[derive(Clone, Default)]
pub struct MemoryAssetStore {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    put_calls: Arc<AtomicU64>,
    max_object_bytes: Option<u64>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes larger than `bytes`, the way a real store enforces its
    /// object size limit
    pub fn with_max_object_bytes(mut self, bytes: u64) -> Self {
        self.max_object_bytes = Some(bytes);
        self
    }

    /// Stored bytes for a key, if present
    pub fn read(&self, key: &StorageKey) -> Option<Bytes> {
        self.objects.read().get(key.as_str()).map(|o| o.content.clone())
    }

    /// Stored content type for a key, if present
    pub fn content_type(&self, key: &StorageKey) -> Option<String> {
        self.objects
            .read()
            .get(key.as_str())
            .map(|o| o.content_type.clone())
    }

    /// Dereference a `memory://` signed URL back to the stored bytes
    pub fn resolve_url(&self, url: &str) -> Option<Bytes> {
        let key = url.strip_prefix("memory://")?;
        let key = key.split('?').next()?;
        self.objects.read().get(key).map(|o| o.content.clone())
    }

    pub fn contains(&self, key: &StorageKey) -> bool {
        self.objects.read().contains_key(key.as_str())
    }

    pub fn object_count(&self) -> usize {
        self.objects.read().len()
    }

    /// Total `put` calls observed, failed ones included
    pub fn put_calls(&self) -> u64 {
        self.put_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn put(
        &self,
        key: &StorageKey,
        content_type: &str,
        content: Bytes,
    ) -> StoreResult<PutReceipt> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(limit) = self.max_object_bytes {
            if content.len() as u64 > limit {
                return Err(StoreError::permanent(format!(
                    "object size {} exceeds the {} byte limit",
                    content.len(),
                    limit
                )));
            }
        }

        let size_bytes = content.len() as u64;
        // Last writer wins, matching retry-over-the-same-key semantics
        self.objects.write().insert(
            key.as_str().to_string(),
            StoredObject {
                content,
                content_type: content_type.to_string(),
            },
        );

        Ok(PutReceipt {
            etag: None,
            size_bytes,
        })
    }

    async fn sign_read(&self, key: &StorageKey, expires_in: Duration) -> StoreResult<String> {
        if !self.objects.read().contains_key(key.as_str()) {
            return Err(StoreError::permanent(format!("object not found: {}", key)));
        }

        let expires_at = Utc::now()
            .timestamp()
            .saturating_add(expires_in.as_secs().min(i64::MAX as u64) as i64);

        Ok(format!("memory://{}?expires={}", key, expires_at))
    }

    async fn delete(&self, key: &StorageKey) -> StoreResult<()> {
        self.objects.write().remove(key.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StorageKey {
        StorageKey::from_string(s.to_string())
    }

    #[tokio::test]
    async fn put_then_read_round_trips_bytes_and_content_type() {
        let store = MemoryAssetStore::new();
        let k = key("assets/a.jpg");

        let receipt = store
            .put(&k, "image/jpeg", Bytes::from_static(b"jpeg bytes"))
            .await
            .unwrap();

        assert_eq!(receipt.size_bytes, 10);
        assert_eq!(store.read(&k).unwrap(), Bytes::from_static(b"jpeg bytes"));
        assert_eq!(store.content_type(&k).unwrap(), "image/jpeg");
    }

    #[tokio::test]
    async fn oversized_put_is_a_permanent_rejection() {
        let store = MemoryAssetStore::new().with_max_object_bytes(4);
        let result = store
            .put(&key("assets/big"), "image/png", Bytes::from_static(b"12345"))
            .await;

        let err = result.unwrap_err();
        assert!(!err.is_transient());
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn signing_an_unknown_key_fails() {
        let store = MemoryAssetStore::new();
        let result = store
            .sign_read(&key("assets/missing"), Duration::from_secs(60))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn signed_url_resolves_to_the_stored_bytes() {
        let store = MemoryAssetStore::new();
        let k = key("assets/b.png");
        store
            .put(&k, "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();

        let url = store.sign_read(&k, Duration::from_secs(60)).await.unwrap();
        assert!(url.starts_with("memory://assets/b.png?expires="));
        assert_eq!(store.resolve_url(&url).unwrap(), Bytes::from_static(b"png"));
    }

    #[tokio::test]
    async fn delete_removes_the_object() {
        let store = MemoryAssetStore::new();
        let k = key("assets/c.gif");
        store
            .put(&k, "image/gif", Bytes::from_static(b"gif"))
            .await
            .unwrap();

        store.delete(&k).await.unwrap();
        assert!(!store.contains(&k));
        // deleting again is not an error
        store.delete(&k).await.unwrap();
    }
}
