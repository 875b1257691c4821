//! Cache Entry Module
//!
//! One cached response representation, and its persisted record format.
//!
//! An entry serializes to a single JSON record: `cached` (payload bytes,
//! base64), `expires` (TTL in seconds), `timestamp` (creation time, epoch
//! milliseconds), `headers`, `etag` (null when absent), and `mediaType`.
//! All fields except `etag` are required on decode.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::codec::{HeaderMap, MediaType};

// == Cache Entry ==
/// A cached response representation for one (URI, media type) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Cached response body
    #[serde(rename = "cached", with = "base64_payload")]
    pub payload: Vec<u8>,
    /// Entry lifetime in seconds, fixed at creation
    #[serde(rename = "expires")]
    pub ttl_seconds: u64,
    /// Creation timestamp (epoch milliseconds), never mutated
    #[serde(rename = "timestamp")]
    pub created_at_ms: i64,
    /// Cached response headers
    pub headers: HeaderMap,
    /// Entity tag of the cached representation, if any
    #[serde(default)]
    pub etag: Option<String>,
    /// Media type of the cached representation
    #[serde(rename = "mediaType")]
    pub media_type: MediaType,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(
        headers: HeaderMap,
        payload: Vec<u8>,
        ttl_seconds: u64,
        etag: Option<String>,
        media_type: MediaType,
    ) -> Self {
        Self {
            payload,
            ttl_seconds,
            created_at_ms: Utc::now().timestamp_millis(),
            headers,
            etag,
            media_type,
        }
    }

    /// Absolute expiration time in epoch milliseconds.
    ///
    /// Saturates for TTLs too large to represent; a huge TTL means
    /// "effectively never", not an overflowed deadline in the past.
    pub fn expires_at_ms(&self) -> i64 {
        let ttl_ms = i64::try_from(self.ttl_seconds)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        self.created_at_ms.saturating_add(ttl_ms)
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: the entry is expired once the current time is
    /// greater than or equal to the expiration time.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() >= self.expires_at_ms()
    }

    // == Remaining Lifetime ==
    /// Remaining TTL in whole seconds. Negative once the entry has
    /// expired; the HTTP layer uses this for `Cache-Control: max-age`.
    pub fn expiration_in_seconds(&self) -> i64 {
        let elapsed_seconds = (Utc::now().timestamp_millis() - self.created_at_ms) / 1000;
        i64::try_from(self.ttl_seconds)
            .unwrap_or(i64::MAX)
            .saturating_sub(elapsed_seconds)
    }
}

// == Payload Encoding ==
/// Serde adapter storing the payload as base64 so the JSON record stays
/// binary-safe.
mod base64_payload {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}
