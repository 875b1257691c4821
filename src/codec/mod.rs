//! Codec Module
//!
//! Schema-less serialization for cache entries: dynamically-typed header
//! values, structured media types, and multi-valued header maps. Entries
//! are persisted as single JSON records; the types here guarantee exact
//! round-trip fidelity, including numeric type tags.

mod headers;
mod media_type;
mod value;

// Re-export public types
pub use headers::HeaderMap;
pub use media_type::{MediaType, WILDCARD};
pub use value::Value;
