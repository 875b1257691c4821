//! Cache Module
//!
//! Server-side HTTP response caching against a key-value backend, with
//! content-negotiated lookup across the media-type variants stored for a
//! URI.

mod entry;
mod keys;
mod scan;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use keys::{entry_key, index_key, namespace_prefix};
pub use scan::delete_prefixed;
pub use store::CacheStore;

// == Public Constants ==
/// Separator between key segments. Reserved: never legal inside a
/// namespace, and never ambiguous against the media-type suffix of an
/// entry key.
pub const KEY_DELIMITER: &str = ":";

/// Lower bound, in seconds, for the TTL of a URI's variant index (1 day).
///
/// The index must outlive every entry it references, so its TTL on each
/// add is the larger of this window and the entry's own TTL. Members whose
/// entries expired earlier are skipped lazily on lookup.
pub const INDEX_SAFETY_WINDOW_SECONDS: u64 = 86_400;

// == Cache Control ==
/// Caching directives supplied by the caller when storing a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheControl {
    /// Entry lifetime in seconds (`max-age`)
    pub max_age_seconds: u64,
}

impl CacheControl {
    /// Creates cache-control directives with the given max-age.
    pub fn max_age(seconds: u64) -> Self {
        Self {
            max_age_seconds: seconds,
        }
    }
}
