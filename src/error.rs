//! Error types for the response cache
//!
//! Provides unified error handling using thiserror.
//!
//! Only failures that abort the current operation surface here. A stored
//! record that fails to decode is treated as a cache miss, not an error,
//! so lookups keep working across format changes and partial corruption.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the response cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A cache entry could not be serialized for storage.
    /// The write is aborted and nothing is persisted for the call.
    #[error("Failed to encode cache entry: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The backing store could not be reached or timed out.
    /// Callers should treat this as a cache miss and compute the
    /// response live.
    #[error("Cache backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A media type string could not be parsed.
    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::BackendUnavailable(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the response cache.
pub type Result<T> = std::result::Result<T, CacheError>;
