//! In-process real-time cache with per-key TTLs.
//!
//! Expired entries are dropped lazily on read and pruned opportunistically
//! on write; there is no background reaper task.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use backend_domain::ports::RealtimeCache;

struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

#[derive(Default)]
pub struct MemoryTtlCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryTtlCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RealtimeCache for MemoryTtlCache {
    async fn set_with_ttl(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl_seconds: u64,
    ) -> anyhow::Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        // Entry exists but is stale; drop it under the write lock.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if entry.expires_at <= now {
                entries.remove(key);
            }
        }
        Ok(None)
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_their_ttl() {
        let cache = MemoryTtlCache::new();
        cache
            .set_with_ttl("offer:p1", json!({"discount": 25}), 600)
            .await
            .expect("set");

        assert!(cache.get("offer:p1").await.expect("get").is_some());

        tokio::time::advance(Duration::from_secs(599)).await;
        assert!(cache.get("offer:p1").await.expect("get").is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("offer:p1").await.expect("get").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn set_refreshes_the_deadline() {
        let cache = MemoryTtlCache::new();
        cache
            .set_with_ttl("bonus:p1", json!(1), 60)
            .await
            .expect("set");
        tokio::time::advance(Duration::from_secs(50)).await;
        cache
            .set_with_ttl("bonus:p1", json!(2), 60)
            .await
            .expect("set again");
        tokio::time::advance(Duration::from_secs(50)).await;

        let value = cache.get("bonus:p1").await.expect("get");
        assert_eq!(value, Some(json!(2)));
    }

    #[tokio::test]
    async fn remove_clears_the_key() {
        let cache = MemoryTtlCache::new();
        cache
            .set_with_ttl("offer:p1", json!(true), 60)
            .await
            .expect("set");
        cache.remove("offer:p1").await.expect("remove");
        assert!(cache.get("offer:p1").await.expect("get").is_none());
    }
}
