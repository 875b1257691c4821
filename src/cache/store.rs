//! Cache Store Module
//!
//! The store orchestrates get/add/remove/clear against the key-value
//! backend: key derivation, entry (de)serialization, variant-index
//! maintenance, and bulk invalidation.

use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::cache::{
    delete_prefixed, entry_key, index_key, namespace_prefix, CacheControl, CacheEntry,
    INDEX_SAFETY_WINDOW_SECONDS,
};
use crate::codec::{HeaderMap, MediaType};
use crate::error::Result;

// == Cache Store ==
/// Server-side HTTP response cache over a key-value backend.
///
/// Holds no mutable state of its own; all shared state lives in the
/// backend, and concurrency guarantees are whatever the backend's
/// per-command atomicity provides.
#[derive(Debug)]
pub struct CacheStore<B: Backend> {
    /// Key-value backend
    backend: B,
    /// Optional prefix confining this store's keys
    namespace: Option<String>,
}

impl<B: Backend> CacheStore<B> {
    // == Constructor ==
    /// Creates a store owning the whole backend key space.
    pub fn new(backend: B) -> Self {
        Self::with_namespace(backend, None)
    }

    /// Creates a store whose keys are confined to `namespace`.
    pub fn with_namespace(backend: B, namespace: Option<String>) -> Self {
        Self { backend, namespace }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn ns(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    // == Get ==
    /// Looks up a cached representation of `uri` compatible with `accept`.
    ///
    /// Walks the URI's variant index and returns the first compatible
    /// entry. Index members whose entry has already expired are skipped,
    /// as are records that fail to decode; both degrade to a miss, never
    /// an error. Set iteration order is unspecified, so a wildcard accept
    /// may return any one of several compatible variants.
    pub async fn get(&self, uri: &str, accept: &MediaType) -> Result<Option<CacheEntry>> {
        let index = index_key(self.ns(), uri);
        let members = self.backend.smembers(&index).await?;

        for member in members {
            let record = match self.backend.get(&member).await? {
                Some(record) => record,
                None => {
                    // Stale index member: the backend expired the entry
                    debug!(key = %member, "skipping index member with no entry");
                    continue;
                }
            };

            let entry: CacheEntry = match serde_json::from_str(&record) {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(key = %member, error = %err, "skipping undecodable cache record");
                    continue;
                }
            };

            if accept.is_compatible(&entry.media_type) {
                debug!(uri, media_type = %entry.media_type, "cache hit");
                return Ok(Some(entry));
            }
        }

        debug!(uri, accept = %accept, "cache miss");
        Ok(None)
    }

    // == Add ==
    /// Stores a response representation for `uri` and returns the new
    /// entry.
    ///
    /// The entry lives for the cache-control max-age; the variant index is
    /// extended (idempotently) with the entry key and its TTL is raised to
    /// at least [`INDEX_SAFETY_WINDOW_SECONDS`], never lowered below the
    /// entry's lifetime. The writes are batched into one backend round
    /// trip but are not cross-key atomic; concurrent adds race at
    /// last-write-wins granularity on the entry record.
    pub async fn add(
        &self,
        uri: &str,
        media_type: MediaType,
        cache_control: &CacheControl,
        headers: HeaderMap,
        payload: Vec<u8>,
        etag: Option<String>,
    ) -> Result<CacheEntry> {
        let entry = CacheEntry::new(
            headers,
            payload,
            cache_control.max_age_seconds,
            etag,
            media_type,
        );

        let index = index_key(self.ns(), uri);
        let entry_key = entry_key(self.ns(), uri, &entry.media_type);
        let record = serde_json::to_string(&entry)?;
        let index_ttl = INDEX_SAFETY_WINDOW_SECONDS.max(entry.ttl_seconds);

        self.backend
            .store_entry(&index, &entry_key, &record, entry.ttl_seconds, index_ttl)
            .await?;

        debug!(
            uri,
            media_type = %entry.media_type,
            ttl_seconds = entry.ttl_seconds,
            "stored cache entry"
        );
        Ok(entry)
    }

    // == Remove ==
    /// Invalidates every representation cached for `uri`.
    ///
    /// Deletes the index key and every entry key derived from it via a
    /// prefix scan. Not atomic with a concurrent add to the same URI: an
    /// in-flight entry may land behind the cursor and survive, or be
    /// deleted along with the rest. Either outcome is accepted.
    pub async fn remove(&self, uri: &str) -> Result<()> {
        let prefix = index_key(self.ns(), uri);
        info!(uri, "removing cached representations");
        delete_prefixed(&self.backend, &prefix).await
    }

    // == Clear ==
    /// Empties the cache.
    ///
    /// With a namespace configured, deletes only that namespace's keys and
    /// leaves the rest of the store untouched. Without one, flushes the
    /// whole database; use only when this store owns the database.
    pub async fn clear(&self) -> Result<()> {
        match self.ns() {
            Some(ns) => {
                info!(namespace = ns, "clearing namespace");
                delete_prefixed(&self.backend, &namespace_prefix(ns)).await
            }
            None => {
                info!("flushing entire cache database");
                self.backend.flush_db().await
            }
        }
    }
}
