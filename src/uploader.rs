//! Single-file upload task: bounded write retries, then signed URL minting.
//!
//! Each file moves through pending -> writing -> (write acknowledged ->
//! URL minting -> delivered) or, when the retry budget runs out, to a
//! permanent per-file failure. Tasks are fully independent: a retry here
//! never blocks another file's upload.

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::{
    AssetReceipt, AssetStore, PipelineConfig, PutReceipt, StorageKey, StoreError, UploadError,
    UploadOutcome, UploadRequest,
};

/// Run one file to a terminal state. Infallible by design - failures are
/// values inside the returned outcome.
pub(crate) async fn run(
    store: &dyn AssetStore,
    config: &PipelineConfig,
    key: StorageKey,
    request: UploadRequest,
) -> UploadOutcome {
    if request.size_bytes() > config.max_asset_bytes {
        warn!(
            "Rejecting {}: {} bytes exceeds the {} byte limit",
            request.filename,
            request.size_bytes(),
            config.max_asset_bytes
        );
        return UploadOutcome::Failed(UploadError::rejected(format!(
            "{} bytes exceeds the {} byte limit",
            request.size_bytes(),
            config.max_asset_bytes
        )));
    }

    let (put, attempts) = match write_with_retry(store, config, &key, &request).await {
        Ok(acknowledged) => acknowledged,
        Err(err) => {
            error!("Upload of {} failed permanently: {}", request.filename, err);
            discard_undelivered(store, config, &key).await;
            return UploadOutcome::Failed(err);
        }
    };

    let url = match sign_with_retry(store, config, &key).await {
        Ok(url) => url,
        Err(err) => {
            error!(
                "Write of {} landed at {} but no URL could be minted: {}",
                request.filename, key, err
            );
            discard_undelivered(store, config, &key).await;
            return UploadOutcome::Failed(err);
        }
    };

    debug!("Delivered {} as {} after {} attempts", request.filename, key, attempts);

    UploadOutcome::Delivered(AssetReceipt {
        key,
        url,
        filename: request.filename,
        content_type: request.mime_type,
        size_bytes: put.size_bytes,
        etag: put.etag,
        uploaded_at: Utc::now().timestamp(),
        attempts,
    })
}

/// Write loop: the same key is reused across attempts, overwriting any
/// partial prior write. Only transient errors consume the retry budget;
/// a permanent store rejection fails the file immediately.
async fn write_with_retry(
    store: &dyn AssetStore,
    config: &PipelineConfig,
    key: &StorageKey,
    request: &UploadRequest,
) -> Result<(PutReceipt, u32), UploadError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        debug!("Writing {} (attempt {}/{})", key, attempt, config.max_attempts);

        match store
            .put(key, &request.mime_type, request.content.clone())
            .await
        {
            Ok(put) => return Ok((put, attempt)),
            Err(err) if err.is_transient() && attempt < config.max_attempts => {
                warn!("Write of {} failed, will retry: {}", key, err);
                tokio::time::sleep(config.retry_delay).await;
            }
            Err(StoreError::Transient(last_error)) => {
                return Err(UploadError::exhausted(attempt, last_error));
            }
            Err(err) => return Err(UploadError::rejected(err.message())),
        }
    }
}

/// URL minting gets its own bounded retry loop so a transient signing blip
/// does not discard an acknowledged write.
async fn sign_with_retry(
    store: &dyn AssetStore,
    config: &PipelineConfig,
    key: &StorageKey,
) -> Result<String, UploadError> {
    let mut attempt = 0;
    loop {
        attempt += 1;

        match store.sign_read(key, config.signed_url_ttl).await {
            Ok(url) => return Ok(url),
            Err(err) if err.is_transient() && attempt < config.max_attempts => {
                warn!("Signing read URL for {} failed, will retry: {}", key, err);
                tokio::time::sleep(config.retry_delay).await;
            }
            Err(err) => return Err(UploadError::signed_url(key.as_str(), err.message())),
        }
    }
}

/// An object that cannot be delivered must not linger: without a returned URL
/// nothing downstream will ever reference or reclaim it.
async fn discard_undelivered(store: &dyn AssetStore, config: &PipelineConfig, key: &StorageKey) {
    if !config.cleanup_failed_writes {
        return;
    }
    if let Err(err) = store.delete(key).await {
        warn!("Failed to clean up undelivered object {}: {}", key, err);
    }
}
