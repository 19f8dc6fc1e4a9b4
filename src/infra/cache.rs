//! In-process cache with per-entry TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::BlogCache;

struct Entry {
    payload: String,
    expires_at: Instant,
}

/// Shared map of serialized payloads. Expired entries are dropped lazily
/// on read; concurrent writers for the same key simply overwrite each
/// other, which is benign because both hold the same store snapshot.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let guard = self.entries.read().await;
            match guard.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.payload.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Entry exists but expired; evict under the write lock.
        let mut guard = self.entries.write().await;
        if let Some(entry) = guard.get(key) {
            if entry.expires_at > now {
                return Some(entry.payload.clone());
            }
            guard.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let entry = Entry {
            payload: value,
            expires_at: Instant::now() + ttl,
        };
        let mut guard = self.entries.write().await;
        guard.insert(key.to_string(), entry);
    }

    async fn delete(&self, key: &str) {
        let mut guard = self.entries.write().await;
        guard.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_returns_the_payload() {
        let cache = MemoryCache::new();
        cache
            .set("k", "v".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("k").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn delete_removes_the_entry() {
        let cache = MemoryCache::new();
        cache
            .set("k", "v".to_string(), Duration::from_secs(60))
            .await;
        cache.delete("k").await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set("k", "v".to_string(), Duration::from_millis(60_000))
            .await;

        tokio::time::advance(Duration::from_millis(59_999)).await;
        assert!(cache.get("k").await.is_some());

        tokio::time::advance(Duration::from_millis(2)).await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn set_overwrites_existing_payload() {
        let cache = MemoryCache::new();
        cache
            .set("k", "old".to_string(), Duration::from_secs(60))
            .await;
        cache
            .set("k", "new".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("k").await.as_deref(), Some("new"));
    }
}
