//! Prefix Scanner Module
//!
//! Cursor-driven enumeration and batched deletion of every key sharing a
//! prefix. Uses SCAN rather than KEYS so the backend is never blocked by
//! an unbounded key space.

use tracing::debug;

use crate::backend::{Backend, SCAN_CURSOR_START};
use crate::error::Result;

// == Prefix Deletion ==
/// Deletes every key whose name starts with `prefix`.
///
/// Runs the scan cursor from the zero sentinel until it returns there,
/// deleting each batch of matched keys eagerly before the next scan step.
/// Scans are weakly consistent: keys added or removed concurrently may or
/// may not be observed. Deletion is idempotent, so a failed pass can be
/// retried; batches already deleted stay deleted.
///
/// The prefix is passed to Redis as a MATCH pattern, so glob
/// metacharacters (`*`, `?`, `[`) occurring in it act as wildcards there,
/// while [`MemoryBackend`](crate::backend::MemoryBackend) compares the
/// prefix literally. Cache keys are built from URIs and media types, which
/// do not carry glob syntax in practice.
pub async fn delete_prefixed<B: Backend>(backend: &B, prefix: &str) -> Result<()> {
    let pattern = format!("{}*", prefix);
    let mut cursor = SCAN_CURSOR_START.to_string();
    let mut deleted = 0usize;

    loop {
        let (keys, next_cursor) = backend.scan_match(&cursor, &pattern).await?;
        if !keys.is_empty() {
            deleted += keys.len();
            backend.del(&keys).await?;
        }
        cursor = next_cursor;
        if cursor == SCAN_CURSOR_START {
            break;
        }
    }

    debug!(prefix, deleted, "prefix deletion complete");
    Ok(())
}
