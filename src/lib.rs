//! rescache - A Redis-backed server-side HTTP response cache
//!
//! Stores response representations keyed by URI and media type, so a
//! request-handling layer can serve content-negotiated responses from
//! cache. The HTTP semantics (conditional GET, `ETag` validation,
//! cache-control emission) live in that layer; this crate provides the
//! cache backend, key space, and entry codec.
//!
//! # Example
//! ```no_run
//! use rescache::{CacheControl, CacheStore, Config, HeaderMap, MediaType, RedisBackend};
//!
//! # async fn run() -> rescache::Result<()> {
//! let config = Config::from_env();
//! let backend = RedisBackend::connect(&config).await?;
//! let store = CacheStore::with_namespace(backend, config.namespace.clone());
//!
//! let entry = store
//!     .add(
//!         "/users/42",
//!         MediaType::new("application", "json"),
//!         &CacheControl::max_age(300),
//!         HeaderMap::new(),
//!         br#"{"id":42}"#.to_vec(),
//!         Some("\"v1\"".to_string()),
//!     )
//!     .await?;
//!
//! let cached = store.get("/users/42", &MediaType::wildcard()).await?;
//! assert_eq!(cached.as_ref(), Some(&entry));
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod cache;
pub mod codec;
pub mod config;
pub mod error;

pub use backend::{Backend, MemoryBackend, RedisBackend};
pub use cache::{CacheControl, CacheEntry, CacheStore};
pub use codec::{HeaderMap, MediaType, Value};
pub use config::Config;
pub use error::{CacheError, Result};
