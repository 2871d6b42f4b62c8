use serde::{Deserialize, Serialize};

use crate::StorageKey;

/// Receipt returned for each successfully delivered asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetReceipt {
    /// Key the object was stored under
    pub key: StorageKey,
    /// Durable signed read URL for the object
    pub url: String,
    /// Original filename as declared by the caller
    pub filename: String,
    /// Declared media type, stored as object metadata
    pub content_type: String,
    pub size_bytes: u64,
    pub etag: Option<String>,
    /// Unix seconds at which the write was acknowledged
    pub uploaded_at: i64,
    /// Write attempts consumed, retries included
    pub attempts: u32,
}
