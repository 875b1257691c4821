//! Backend Module
//!
//! The key-value store primitives the cache is built on. The trait mirrors
//! the Redis commands the store issues (GET, SETEX, SADD, SMEMBERS, EXPIRE,
//! SCAN, DEL, FLUSHDB); [`RedisBackend`] is the production implementation
//! and [`MemoryBackend`] is a hermetic in-process one.
//!
//! Every call is bounded by the backend's own timeout. Single commands are
//! atomic; sequences of them are not, and the cache layer is written to
//! tolerate that.

mod memory;
mod redis;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use self::memory::MemoryBackend;
pub use self::redis::RedisBackend;

/// Initial and terminal SCAN cursor sentinel.
pub const SCAN_CURSOR_START: &str = "0";

// == Backend Trait ==
/// Key-value store primitives required by the cache.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetches the string value at `key`, or None if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` at `key` with a TTL in seconds.
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()>;

    /// Adds `member` to the set at `key`. Idempotent: adding an existing
    /// member is a no-op.
    async fn sadd(&self, key: &str, member: &str) -> Result<()>;

    /// Returns all members of the set at `key`. Order is unspecified.
    async fn smembers(&self, key: &str) -> Result<Vec<String>>;

    /// Sets the TTL of `key` in seconds.
    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<()>;

    /// One step of a cursor-driven key scan. Returns the keys matching
    /// `pattern` in this batch and the next cursor; a returned cursor of
    /// [`SCAN_CURSOR_START`] means the scan is complete. Keys added or
    /// removed concurrently may or may not be observed.
    async fn scan_match(&self, cursor: &str, pattern: &str) -> Result<(Vec<String>, String)>;

    /// Deletes the given keys. Missing keys are ignored.
    async fn del(&self, keys: &[String]) -> Result<()>;

    /// Removes every key in the store. Destructive.
    async fn flush_db(&self) -> Result<()>;

    /// Stores one cache entry: adds `entry_key` to the index set, refreshes
    /// the index TTL, and writes the serialized record, in one logical
    /// round trip where the backend supports batching. Not cross-key
    /// atomic.
    async fn store_entry(
        &self,
        index_key: &str,
        entry_key: &str,
        record: &str,
        entry_ttl_seconds: u64,
        index_ttl_seconds: u64,
    ) -> Result<()> {
        self.sadd(index_key, entry_key).await?;
        self.expire(index_key, index_ttl_seconds).await?;
        self.set_ex(entry_key, record, entry_ttl_seconds).await?;
        Ok(())
    }
}
