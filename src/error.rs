use thiserror::Error;

/// Result type for store collaborator operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a storage backend - determines retry behavior
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Transient write/network failure - will retry if attempts remain
    #[error("transient storage error: {0}")]
    Transient(String),

    /// Backend rejected the operation - retrying cannot help
    #[error("permanent storage error: {0}")]
    Permanent(String),

    /// Store misconfiguration (missing credentials, bucket). Fatal at
    /// construction time, never raised per request.
    #[error("storage configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Create a transient error
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Create a permanent error
    pub fn permanent(msg: impl Into<String>) -> Self {
        Self::Permanent(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this error is worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        match self {
            Self::Transient(msg) | Self::Permanent(msg) | Self::Config(msg) => msg,
        }
    }
}

/// Terminal per-file failure, embedded in an upload outcome.
///
/// Batch uploads never raise one of these as an aggregate error - each failed
/// file reports its own.
#[derive(Error, Debug, Clone)]
pub enum UploadError {
    /// Retry budget exhausted without an acknowledged write
    #[error("upload failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    /// Write completed but no durable read URL could be minted
    #[error("signed URL request failed for {key}: {reason}")]
    SignedUrl { key: String, reason: String },

    /// Rejected outright (oversized content, backend refusal) - no retries
    #[error("asset rejected: {reason}")]
    Rejected { reason: String },
}

impl UploadError {
    /// Create an exhausted-retries error
    pub fn exhausted(attempts: u32, last_error: impl Into<String>) -> Self {
        Self::Exhausted {
            attempts,
            last_error: last_error.into(),
        }
    }

    /// Create a signed URL error
    pub fn signed_url(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SignedUrl {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a rejection error
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Stable name for logs and wire-facing summaries
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Exhausted { .. } => "exhausted",
            Self::SignedUrl { .. } => "signed_url",
            Self::Rejected { .. } => "rejected",
        }
    }
}
