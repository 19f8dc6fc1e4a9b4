//! Cache contract for the read path.
//!
//! The cache stores opaque serialized payloads keyed by strings built in
//! [`keys`]. Entries expire by TTL; the only explicit invalidation is the
//! blog-by-id key deleted during unpublish.

pub mod keys;

use std::time::Duration;

use async_trait::async_trait;

/// Canonical entry lifetime when none is configured.
pub const DEFAULT_TTL: Duration = Duration::from_millis(60_000);

/// Key/value store with per-entry TTL. Serialized payloads go in, strings
/// come out; deserialization and validation belong to the caller.
#[async_trait]
pub trait BlogCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String, ttl: Duration);

    async fn delete(&self, key: &str);
}
