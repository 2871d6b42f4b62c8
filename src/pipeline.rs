use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};

use crate::{
    uploader, AssetStore, BatchResult, KeyStrategy, PipelineConfig, RandomKeyStrategy, UploadCtx,
    UploadRequest,
};

/// The batch upload orchestrator - this is what request handlers embed.
///
/// The store collaborator is constructed once and injected; substituting a
/// fake in tests is a constructor argument, never a hidden global.
pub struct UploadPipeline {
    store: Arc<dyn AssetStore>,
    keys: Arc<dyn KeyStrategy>,
    config: PipelineConfig,
}

impl UploadPipeline {
    /// Create a new pipeline over a store collaborator
    pub fn new<S: AssetStore + 'static>(store: S, config: PipelineConfig) -> Self {
        Self {
            store: Arc::new(store),
            keys: Arc::new(RandomKeyStrategy),
            config,
        }
    }

    /// Create with a custom key strategy
    pub fn with_key_strategy<S, K>(store: S, keys: K, config: PipelineConfig) -> Self
    where
        S: AssetStore + 'static,
        K: KeyStrategy + 'static,
    {
        Self {
            store: Arc::new(store),
            keys: Arc::new(keys),
            config,
        }
    }

    /// Upload a batch of files concurrently and collect per-file outcomes.
    ///
    /// All files are uploaded at once and the call returns only when every
    /// file has reached a terminal state - one file's permanent failure
    /// neither cancels nor delays the others, and no aggregate error is
    /// raised for partial failure. `result[i]` corresponds to `batch[i]`
    /// regardless of completion order.
    ///
    /// There is no mid-flight cancellation: a started batch runs every file
    /// to success or exhausted retries. Callers that need a deadline must
    /// enforce it outside and treat the batch as abandoned.
    pub async fn upload(&self, ctx: UploadCtx, batch: Vec<UploadRequest>) -> BatchResult {
        if batch.is_empty() {
            debug!("Empty asset batch for entity {}, nothing to do", ctx.entity_id);
            return BatchResult::empty();
        }

        info!(
            "Uploading {} asset(s) for entity {} (request {})",
            batch.len(),
            ctx.entity_id,
            ctx.request_id
        );

        let uploads = batch.into_iter().map(|request| {
            let key = self.keys.object_key(&self.config.key_prefix, &request.filename);
            uploader::run(self.store.as_ref(), &self.config, key, request)
        });

        // join_all keeps outcomes in input order, whatever order tasks finish in
        let result = BatchResult::new(join_all(uploads).await);

        info!(
            "Asset batch for entity {} complete: {}/{} delivered",
            ctx.entity_id,
            result.delivered_count(),
            result.len()
        );

        result
    }

    /// Get configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
