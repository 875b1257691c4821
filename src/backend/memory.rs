//! In-Memory Backend
//!
//! A process-local implementation of the [`Backend`] primitives with real
//! TTL bookkeeping and cursor-batched scans. Used by the test suite in
//! place of a live Redis instance, and usable as an embedded single-process
//! cache.

use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::backend::{Backend, SCAN_CURSOR_START};
use crate::error::{CacheError, Result};

/// Default number of keys returned per scan step.
const DEFAULT_SCAN_BATCH: usize = 10;

// == Stored Data ==
/// Value stored at a key: a plain string or a set of members.
#[derive(Debug)]
enum Stored {
    Value(String),
    Set(HashSet<String>),
}

/// One key slot with its optional expiration deadline.
#[derive(Debug)]
struct Slot {
    stored: Stored,
    expires_at: Option<Instant>,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map_or(false, |deadline| now >= deadline)
    }
}

// == Memory Backend ==
/// In-process key-value store with TTL support.
#[derive(Debug)]
pub struct MemoryBackend {
    slots: Mutex<BTreeMap<String, Slot>>,
    scan_batch: usize,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an empty backend with the default scan batch size.
    pub fn new() -> Self {
        Self::with_scan_batch(DEFAULT_SCAN_BATCH)
    }

    /// Creates an empty backend returning at most `scan_batch` keys per
    /// scan step.
    pub fn with_scan_batch(scan_batch: usize) -> Self {
        Self {
            slots: Mutex::new(BTreeMap::new()),
            scan_batch: scan_batch.max(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Slot>>> {
        self.slots
            .lock()
            .map_err(|_| CacheError::BackendUnavailable("memory backend lock poisoned".to_string()))
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut slots = self.lock()?;
        let now = Instant::now();

        if slots.get(key).is_some_and(|slot| slot.is_expired(now)) {
            slots.remove(key);
            return Ok(None);
        }

        match slots.get(key) {
            Some(Slot {
                stored: Stored::Value(value),
                ..
            }) => Ok(Some(value.clone())),
            _ => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let mut slots = self.lock()?;
        slots.insert(
            key.to_string(),
            Slot {
                stored: Stored::Value(value.to_string()),
                expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<()> {
        let mut slots = self.lock()?;
        let now = Instant::now();

        // An expired slot, or one holding a plain value, is replaced by a
        // fresh set. The key space keeps value and set keys disjoint, so
        // the latter only happens on misuse.
        match slots.get_mut(key) {
            Some(slot) if !slot.is_expired(now) => {
                if let Stored::Set(members) = &mut slot.stored {
                    members.insert(member.to_string());
                    return Ok(());
                }
            }
            _ => {}
        }

        let mut members = HashSet::new();
        members.insert(member.to_string());
        slots.insert(
            key.to_string(),
            Slot {
                stored: Stored::Set(members),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>> {
        let mut slots = self.lock()?;
        let now = Instant::now();

        if slots.get(key).is_some_and(|slot| slot.is_expired(now)) {
            slots.remove(key);
            return Ok(Vec::new());
        }

        match slots.get(key) {
            Some(Slot {
                stored: Stored::Set(members),
                ..
            }) => Ok(members.iter().cloned().collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<()> {
        let mut slots = self.lock()?;
        let now = Instant::now();

        if let Some(slot) = slots.get_mut(key) {
            if !slot.is_expired(now) {
                slot.expires_at = Some(now + Duration::from_secs(ttl_seconds));
            }
        }
        Ok(())
    }

    async fn scan_match(&self, cursor: &str, pattern: &str) -> Result<(Vec<String>, String)> {
        let slots = self.lock()?;
        let now = Instant::now();
        let prefix = pattern.strip_suffix('*').unwrap_or(pattern);

        // The cursor is the last key returned by the previous step, so the
        // scan stays valid while keys are deleted between steps.
        let range: Box<dyn Iterator<Item = (&String, &Slot)>> = if cursor == SCAN_CURSOR_START {
            Box::new(slots.iter())
        } else {
            Box::new(slots.range::<String, _>((
                Bound::Excluded(cursor.to_string()),
                Bound::Unbounded,
            )))
        };

        let mut keys = Vec::new();
        for (key, slot) in range {
            if slot.is_expired(now) || !key.starts_with(prefix) {
                continue;
            }
            keys.push(key.clone());
            if keys.len() == self.scan_batch {
                break;
            }
        }

        let next_cursor = if keys.len() == self.scan_batch {
            keys.last().cloned().unwrap_or_else(|| SCAN_CURSOR_START.to_string())
        } else {
            SCAN_CURSOR_START.to_string()
        };

        Ok((keys, next_cursor))
    }

    async fn del(&self, keys: &[String]) -> Result<()> {
        let mut slots = self.lock()?;
        for key in keys {
            slots.remove(key);
        }
        Ok(())
    }

    async fn flush_db(&self) -> Result<()> {
        let mut slots = self.lock()?;
        slots.clear();
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_ex_and_get() {
        let backend = MemoryBackend::new();
        backend.set_ex("key", "value", 60).await.unwrap();
        assert_eq!(backend.get("key").await.unwrap(), Some("value".to_string()));
    }

    #[tokio::test]
    async fn test_set_ex_expires() {
        let backend = MemoryBackend::new();
        backend.set_ex("key", "value", 1).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(backend.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sadd_is_idempotent() {
        let backend = MemoryBackend::new();
        backend.sadd("set", "member").await.unwrap();
        backend.sadd("set", "member").await.unwrap();

        assert_eq!(backend.smembers("set").await.unwrap(), vec!["member"]);
    }

    #[tokio::test]
    async fn test_smembers_multiple_members() {
        let backend = MemoryBackend::new();
        backend.sadd("set", "a").await.unwrap();
        backend.sadd("set", "b").await.unwrap();

        let mut members = backend.smembers("set").await.unwrap();
        members.sort();
        assert_eq!(members, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_expire_on_set_key() {
        let backend = MemoryBackend::new();
        backend.sadd("set", "member").await.unwrap();
        backend.expire("set", 1).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(backend.smembers("set").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_del_removes_keys() {
        let backend = MemoryBackend::new();
        backend.set_ex("a", "1", 60).await.unwrap();
        backend.set_ex("b", "2", 60).await.unwrap();

        backend
            .del(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        assert_eq!(backend.get("a").await.unwrap(), None);
        assert_eq!(backend.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flush_db() {
        let backend = MemoryBackend::new();
        backend.set_ex("a", "1", 60).await.unwrap();
        backend.sadd("set", "member").await.unwrap();

        backend.flush_db().await.unwrap();

        assert_eq!(backend.get("a").await.unwrap(), None);
        assert!(backend.smembers("set").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_requires_multiple_iterations() {
        let backend = MemoryBackend::with_scan_batch(10);
        for i in 0..25 {
            backend
                .set_ex(&format!("prefix:{:02}", i), "v", 60)
                .await
                .unwrap();
        }
        backend.set_ex("other:0", "v", 60).await.unwrap();

        let mut cursor = SCAN_CURSOR_START.to_string();
        let mut iterations = 0;
        let mut seen = Vec::new();
        loop {
            let (keys, next) = backend.scan_match(&cursor, "prefix:*").await.unwrap();
            seen.extend(keys);
            iterations += 1;
            cursor = next;
            if cursor == SCAN_CURSOR_START {
                break;
            }
        }

        assert_eq!(seen.len(), 25);
        assert!(iterations >= 3, "expected batched iteration, got {}", iterations);
        assert!(seen.iter().all(|k| k.starts_with("prefix:")));
    }

    #[tokio::test]
    async fn test_scan_tolerates_deletion_between_steps() {
        let backend = MemoryBackend::with_scan_batch(5);
        for i in 0..12 {
            backend
                .set_ex(&format!("p:{:02}", i), "v", 60)
                .await
                .unwrap();
        }

        let mut cursor = SCAN_CURSOR_START.to_string();
        let mut seen = Vec::new();
        loop {
            let (keys, next) = backend.scan_match(&cursor, "p:*").await.unwrap();
            backend.del(&keys).await.unwrap();
            seen.extend(keys);
            cursor = next;
            if cursor == SCAN_CURSOR_START {
                break;
            }
        }

        assert_eq!(seen.len(), 12);
        let (rest, _) = backend
            .scan_match(SCAN_CURSOR_START, "p:*")
            .await
            .unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn test_store_entry_default_batches_three_writes() {
        let backend = MemoryBackend::new();
        backend
            .store_entry("index", "index:entry", "record", 60, 120)
            .await
            .unwrap();

        assert_eq!(
            backend.smembers("index").await.unwrap(),
            vec!["index:entry"]
        );
        assert_eq!(
            backend.get("index:entry").await.unwrap(),
            Some("record".to_string())
        );
    }
}
