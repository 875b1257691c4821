//! Redis Backend
//!
//! Production [`Backend`] implementation over a multiplexed async Redis
//! connection. The connection handle is cloned per logical operation, and
//! connect/response timeouts are set when the connection is established so
//! no call blocks indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::backend::Backend;
use crate::config::Config;
use crate::error::Result;

/// Converts a TTL to the signed form EXPIRE takes, clamping values beyond
/// `i64::MAX` instead of letting them wrap negative.
fn clamp_ttl(ttl_seconds: u64) -> i64 {
    i64::try_from(ttl_seconds).unwrap_or(i64::MAX)
}

// == Redis Backend ==
/// Redis-backed key-value store.
#[derive(Clone)]
pub struct RedisBackend {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisBackend {
    // == Constructor ==
    /// Connects to Redis using the given configuration.
    ///
    /// Fails with `BackendUnavailable` if the server cannot be reached
    /// within the configured connection timeout.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        let conn = client
            .get_multiplexed_async_connection_with_timeouts(
                Duration::from_secs(config.response_timeout),
                Duration::from_secs(config.connect_timeout),
            )
            .await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.sadd(key, member).await?;
        Ok(())
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn.smembers(key).await?;
        Ok(members)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        // Clamp rather than cast: a wrapped-negative EXPIRE deletes the key
        let _: () = conn.expire(key, clamp_ttl(ttl_seconds)).await?;
        Ok(())
    }

    async fn scan_match(&self, cursor: &str, pattern: &str) -> Result<(Vec<String>, String)> {
        let mut conn = self.conn.clone();
        let (next_cursor, keys): (String, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .query_async(&mut conn)
            .await?;
        Ok((keys, next_cursor))
    }

    async fn del(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let _: () = conn.del(keys).await?;
        Ok(())
    }

    async fn flush_db(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }

    async fn store_entry(
        &self,
        index_key: &str,
        entry_key: &str,
        record: &str,
        entry_ttl_seconds: u64,
        index_ttl_seconds: u64,
    ) -> Result<()> {
        // The three writes share one round trip via a pipeline. They are
        // still not cross-key atomic; a concurrent remove may interleave.
        let mut conn = self.conn.clone();
        let _: () = redis::pipe()
            .sadd(index_key, entry_key)
            .ignore()
            .expire(index_key, clamp_ttl(index_ttl_seconds))
            .ignore()
            .set_ex(entry_key, record, entry_ttl_seconds)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::clamp_ttl;
    use crate::backend::SCAN_CURSOR_START;

    #[test]
    fn test_scan_cursor_sentinel_matches_redis() {
        // Redis uses "0" as both the initial and terminal SCAN cursor.
        assert_eq!(SCAN_CURSOR_START, "0");
    }

    #[test]
    fn test_clamp_ttl_saturates_instead_of_wrapping() {
        assert_eq!(clamp_ttl(0), 0);
        assert_eq!(clamp_ttl(86_400), 86_400);
        assert_eq!(clamp_ttl(i64::MAX as u64), i64::MAX);
        assert_eq!(clamp_ttl(u64::MAX), i64::MAX);
    }
}
