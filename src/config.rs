use std::time::Duration;

/// Configuration for the upload pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fixed namespace prefix for generated storage keys
    pub key_prefix: String,

    /// Write attempts per file before the upload is failed permanently
    pub max_attempts: u32,

    /// Flat delay between attempts (not exponential)
    pub retry_delay: Duration,

    /// Validity window requested for signed read URLs
    pub signed_url_ttl: Duration,

    /// Per-file size guard; larger content is rejected without a store call
    pub max_asset_bytes: u64,

    /// Best-effort delete of objects whose upload failed after the write
    /// landed (exhausted retries with a possible partial write, or an
    /// undeliverable object with no minted URL)
    pub cleanup_failed_writes: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            key_prefix: "assets".to_string(),
            max_attempts: 3,
            retry_delay: Duration::from_secs(3),
            signed_url_ttl: Duration::from_secs(60 * 60 * 24 * 365 * 500), // effectively permanent
            max_asset_bytes: 32 * 1024 * 1024, // 32MB
            cleanup_failed_writes: true,
        }
    }
}

impl PipelineConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage key prefix
    pub fn with_key_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the per-file write attempt budget
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the flat delay between attempts
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the signed URL validity window
    pub fn with_signed_url_ttl(mut self, ttl: Duration) -> Self {
        self.signed_url_ttl = ttl;
        self
    }

    /// Set the per-file size guard
    pub fn with_max_asset_bytes(mut self, bytes: u64) -> Self {
        self.max_asset_bytes = bytes;
        self
    }

    /// Keep undeliverable objects in the store instead of deleting them
    pub fn keep_failed_writes(mut self) -> Self {
        self.cleanup_failed_writes = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(3));
        assert_eq!(config.key_prefix, "assets");
        assert!(config.cleanup_failed_writes);
        // far enough out to never expire in practice
        assert!(config.signed_url_ttl >= Duration::from_secs(60 * 60 * 24 * 365 * 100));
    }

    #[test]
    fn attempt_budget_has_a_floor_of_one() {
        let config = PipelineConfig::new().with_max_attempts(0);
        assert_eq!(config.max_attempts, 1);
    }
}
