use std::env;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream as AwsByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::debug;

use crate::{AssetStore, PutReceipt, StorageKey, StoreError, StoreResult};

// S3 rejects presigned URLs valid for more than seven days; requests for a
// longer window are clamped. Truly permanent URLs need a public-read bucket
// behind a CDN instead.
const MAX_PRESIGN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// S3 store configuration from environment variables
#[derive(Debug)]
pub struct S3Config {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    /// Custom endpoint for S3-compatible stores (MinIO, RustFS, R2)
    pub endpoint_url: Option<String>,
}

impl S3Config {
    /// Read configuration from the environment, failing fast on anything
    /// missing so a misconfigured process never accepts a batch.
    pub fn from_env() -> StoreResult<Self> {
        fn get_env(key: &str) -> StoreResult<String> {
            env::var(key)
                .map_err(|_| StoreError::config(format!("{} environment variable required", key)))
        }

        Ok(Self {
            region: get_env("ASSET_STORE_REGION")?,
            access_key_id: get_env("ASSET_STORE_ACCESS_KEY_ID")?,
            secret_access_key: get_env("ASSET_STORE_SECRET_ACCESS_KEY")?,
            bucket: get_env("ASSET_STORE_BUCKET")?,
            endpoint_url: env::var("ASSET_STORE_ENDPOINT_URL").ok(),
        })
    }
}

/// Production store implementation using the AWS SDK (S3-compatible)
#[derive(Clone)]
pub struct S3AssetStore {
    client: Client,
    bucket: String,
}

impl S3AssetStore {
    /// Build a store from environment configuration
    pub async fn from_env() -> StoreResult<Self> {
        let config = S3Config::from_env()?;
        Ok(Self::with_config(config).await)
    }

    /// Build a store from explicit configuration
    pub async fn with_config(config: S3Config) -> Self {
        let credentials = Credentials::new(
            config.access_key_id,
            config.secret_access_key,
            None,
            None,
            "dog-assets",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .credentials_provider(credentials);

        if let Some(endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let aws_config = loader.load().await;

        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(true) // required for S3-compatible endpoints
                .build(),
        );

        Self {
            client,
            bucket: config.bucket,
        }
    }

    /// Dispatch failures, timeouts, and 5xx responses are worth retrying;
    /// anything the service rejected outright is not.
    fn classify_sdk_error<E>(err: SdkError<E>) -> StoreError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match &err {
            SdkError::TimeoutError(_)
            | SdkError::DispatchFailure(_)
            | SdkError::ResponseError(_) => StoreError::transient(err.to_string()),
            SdkError::ServiceError(service_err)
                if service_err.raw().status().as_u16() >= 500 =>
            {
                StoreError::transient(err.to_string())
            }
            _ => StoreError::permanent(err.to_string()),
        }
    }
}

#[async_trait]
impl AssetStore for S3AssetStore {
    async fn put(
        &self,
        key: &StorageKey,
        content_type: &str,
        content: Bytes,
    ) -> StoreResult<PutReceipt> {
        let size_bytes = content.len() as u64;

        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .content_type(content_type)
            .body(AwsByteStream::from(content))
            .send()
            .await
            .map_err(Self::classify_sdk_error)?;

        Ok(PutReceipt {
            etag: result.e_tag,
            size_bytes,
        })
    }

    async fn sign_read(&self, key: &StorageKey, expires_in: Duration) -> StoreResult<String> {
        let ttl = expires_in.min(MAX_PRESIGN_TTL);
        if ttl < expires_in {
            debug!(
                "Clamping signed URL TTL for {} to {} seconds",
                key,
                ttl.as_secs()
            );
        }

        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| StoreError::config(format!("invalid presigning window: {}", e)))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .presigned(presigning)
            .await
            .map_err(Self::classify_sdk_error)?;

        Ok(presigned.uri().to_string())
    }

    async fn delete(&self, key: &StorageKey) -> StoreResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(Self::classify_sdk_error)?;

        Ok(())
    }
}
