//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL
    pub redis_url: String,
    /// Optional namespace prepended to every cache key
    pub namespace: Option<String>,
    /// Connection timeout in seconds for the Redis backend
    pub connect_timeout: u64,
    /// Per-command response timeout in seconds for the Redis backend
    pub response_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis connection URL (default: "redis://127.0.0.1:6379")
    /// - `CACHE_NAMESPACE` - Key namespace (default: none)
    /// - `REDIS_CONNECT_TIMEOUT` - Connection timeout in seconds (default: 5)
    /// - `REDIS_RESPONSE_TIMEOUT` - Per-command timeout in seconds (default: 2)
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            namespace: env::var("CACHE_NAMESPACE").ok().filter(|ns| !ns.is_empty()),
            connect_timeout: env::var("REDIS_CONNECT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            response_timeout: env::var("REDIS_RESPONSE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            namespace: None,
            connect_timeout: 5,
            response_timeout: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert!(config.namespace.is_none());
        assert_eq!(config.connect_timeout, 5);
        assert_eq!(config.response_timeout, 2);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("REDIS_URL");
        env::remove_var("CACHE_NAMESPACE");
        env::remove_var("REDIS_CONNECT_TIMEOUT");
        env::remove_var("REDIS_RESPONSE_TIMEOUT");

        let config = Config::from_env();
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert!(config.namespace.is_none());
        assert_eq!(config.connect_timeout, 5);
        assert_eq!(config.response_timeout, 2);
    }
}
