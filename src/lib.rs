//! # dog-assets: Batch asset upload pipeline
//!
//! `dog-assets` moves a batch of request-attached files into blob storage and
//! hands back one durable read URL per file, with bounded concurrency,
//! per-file retry, and well-defined partial-failure behavior. It exists so
//! marketplace services can stop hand-rolling upload loops.
//!
//! ## Key Features
//!
//! - **Whole-batch fan-out**: every file uploads concurrently; the batch
//!   returns once all files reach a terminal state
//! - **Per-file retry**: transient write failures retry on a flat delay with
//!   a bounded budget, reusing the same storage key
//! - **Partial failure as data**: one file failing never cancels the rest -
//!   each input gets its own outcome, in input order, and the caller decides
//!   what a partial batch means
//! - **Storage agnostic**: any backend with a write + signed-read-URL
//!   contract plugs in behind the [`AssetStore`] trait
//! - **Durable URLs**: successful files come back with long-lived signed
//!   read URLs
//!
//! ## Quick Start
//!
//! ```rust
//! use dog_assets::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() {
//! // 1. Construct the store collaborator once and inject it
//! let store = MemoryAssetStore::new();
//! let pipeline = UploadPipeline::new(store, PipelineConfig::default());
//!
//! // 2. One context per incoming request
//! let ctx = UploadCtx::new("listing-42").with_actor("user-7");
//!
//! // 3. Upload the whole batch
//! let batch = vec![
//!     UploadRequest::new(&b"front view"[..], "front.jpg", "image/jpeg"),
//!     UploadRequest::new(&b"back view"[..], "back.jpg", "image/jpeg"),
//! ];
//! let result = pipeline.upload(ctx, batch).await;
//!
//! // 4. Outcomes are order-correspondent with the batch
//! assert_eq!(result.len(), 2);
//! assert!(result.fully_delivered());
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   Your Handler   │  ← batch in, URLs out, partial-success policy
//! ├──────────────────┤
//! │  UploadPipeline  │  ← fan-out, per-file retry, outcome assembly
//! ├──────────────────┤
//! │    AssetStore    │  ← write / sign-read / delete primitives
//! └──────────────────┘
//! ```
//!
//! The pipeline is infrastructure, not a service - you embed it:
//!
//! ```rust
//! use dog_assets::prelude::*;
//!
//! pub struct ListingMediaService {
//!     assets: UploadPipeline,
//! }
//!
//! impl ListingMediaService {
//!     pub async fn attach_photos(
//!         &self,
//!         listing_id: &str,
//!         files: Vec<UploadRequest>,
//!     ) -> Vec<String> {
//!         let result = self.assets.upload(UploadCtx::new(listing_id), files).await;
//!
//!         // Partial-success policy lives here, not in the pipeline
//!         result.urls().into_iter().map(String::from).collect()
//!     }
//! }
//! ```

mod config;
mod error;
mod memory_store;
mod pipeline;
mod receipt;
mod s3_store;
pub mod store;
mod types;
mod uploader;

// Re-export main types for clean API
pub use config::PipelineConfig;
pub use error::{StoreError, StoreResult, UploadError};
pub use memory_store::MemoryAssetStore;
pub use pipeline::UploadPipeline;
pub use receipt::AssetReceipt;
pub use s3_store::{S3AssetStore, S3Config};
pub use store::{AssetStore, KeyStrategy, PutReceipt, RandomKeyStrategy};
pub use types::{BatchResult, StorageKey, UploadCtx, UploadOutcome, UploadRequest};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AssetReceipt, AssetStore, BatchResult, MemoryAssetStore, PipelineConfig, StorageKey,
        UploadCtx, UploadError, UploadOutcome, UploadPipeline, UploadRequest,
    };
}
