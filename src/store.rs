use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::types::filename_extension;
use crate::{StorageKey, StoreResult};

/// Blob store collaborator surface the pipeline depends on.
///
/// `put` resolving `Ok` is the write-acknowledged event; an `Err` is the
/// stream-level failure. Any object store with a write + signed-read-URL
/// contract is substitutable here. Concurrent writes to distinct keys must be
/// safe without external locking; writes to the same key are last-writer-wins
/// (retries for one file are strictly sequential, so they never race).
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Write the full content under `key`, with the declared media type as
    /// object metadata. Returns once the store acknowledges the write.
    async fn put(
        &self,
        key: &StorageKey,
        content_type: &str,
        content: Bytes,
    ) -> StoreResult<PutReceipt>;

    /// Mint a signed read URL for an existing object
    async fn sign_read(&self, key: &StorageKey, expires_in: Duration) -> StoreResult<String>;

    /// Delete an object. Used to discard objects whose upload failed.
    async fn delete(&self, key: &StorageKey) -> StoreResult<()>;
}

/// Store acknowledgement of a completed write
#[derive(Debug, Clone)]
pub struct PutReceipt {
    pub etag: Option<String>,
    pub size_bytes: u64,
}

/// Strategy for deriving storage keys from input filenames
pub trait KeyStrategy: Send + Sync {
    /// Derive the key one file will be stored under. Called once per file;
    /// the returned key is reused across that file's retries.
    fn object_key(&self, prefix: &str, filename: &str) -> StorageKey;
}

/// Default key strategy: `<prefix>/<uuid-v4>.<extension>`.
///
/// Collision freedom comes from UUID v4 randomness; identically named files
/// always land under distinct keys. The extension is the filename's trailing
/// dot-suffix verbatim, omitted when there is none.
#[derive(Debug, Clone, Default)]
pub struct RandomKeyStrategy;

impl KeyStrategy for RandomKeyStrategy {
    fn object_key(&self, prefix: &str, filename: &str) -> StorageKey {
        let id = Uuid::new_v4();
        match filename_extension(filename) {
            Some(ext) => StorageKey(format!("{}/{}.{}", prefix, id, ext)),
            None => StorageKey(format!("{}/{}", prefix, id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_for_identical_filenames_never_collide() {
        let strategy = RandomKeyStrategy;
        let keys: HashSet<String> = (0..1000)
            .map(|_| strategy.object_key("listings", "photo.jpg").0)
            .collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn key_carries_prefix_and_verbatim_extension() {
        let key = RandomKeyStrategy.object_key("listings", "floor plan.PNG");
        assert!(key.as_str().starts_with("listings/"));
        assert!(key.as_str().ends_with(".PNG"));
    }

    #[test]
    fn key_omits_extension_when_filename_has_none() {
        let key = RandomKeyStrategy.object_key("listings", "README");
        assert!(key.as_str().starts_with("listings/"));
        assert!(!key.as_str().contains('.'));
    }
}
