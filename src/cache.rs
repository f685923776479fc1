use std::time::{Duration, Instant};

use axum::async_trait;
use dashmap::DashMap;

/// Key-value cache with per-entry expiry and prefix scans. The cache is
/// advisory: callers must treat any failure as a miss, never as a request
/// failure.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<()>;
    async fn del(&self, key: &str) -> anyhow::Result<()>;
    async fn del_many(&self, keys: &[String]) -> anyhow::Result<u64>;
    async fn keys(&self, prefix: &str) -> anyhow::Result<Vec<String>>;
}

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn live(&self) -> bool {
        self.expires_at > Instant::now()
    }
}

/// In-process cache. Expired entries are treated as absent and dropped
/// lazily on the next read of their key.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.live() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn del(&self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn del_many(&self, keys: &[String]) -> anyhow::Result<u64> {
        let mut removed = 0;
        for key in keys {
            if self.entries.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn keys(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix) && entry.live())
            .map(|entry| entry.key().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let cache = MemoryCache::new();
        cache
            .set_ex("weather:london", "{}", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            cache.get("weather:london").await.unwrap(),
            Some("{}".to_string())
        );
        assert_eq!(cache.get("weather:paris").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entry_reads_as_absent() {
        let cache = MemoryCache::new();
        cache
            .set_ex("weather:london", "{}", Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("weather:london").await.unwrap(), None);
        assert!(cache.keys("weather:").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn del_removes_single_key() {
        let cache = MemoryCache::new();
        cache
            .set_ex("weather:london", "{}", Duration::from_secs(60))
            .await
            .unwrap();
        cache.del("weather:london").await.unwrap();
        assert_eq!(cache.get("weather:london").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_filters_by_prefix_and_del_many_counts() {
        let cache = MemoryCache::new();
        cache
            .set_ex("weather:london", "{}", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set_ex("weather:paris", "{}", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set_ex("session:abc", "{}", Duration::from_secs(60))
            .await
            .unwrap();

        let mut keys = cache.keys("weather:").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["weather:london", "weather:paris"]);

        let removed = cache.del_many(&keys).await.unwrap();
        assert_eq!(removed, 2);
        assert!(cache.keys("weather:").await.unwrap().is_empty());
        assert!(cache.get("session:abc").await.unwrap().is_some());
    }
}
