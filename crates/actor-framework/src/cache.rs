//! # Cache-Aside
//!
//! Read-through cache with per-entry TTL and explicit eviction. Services call
//! [`CacheAside::get_or_load`] on reads and [`CacheAside::evict`] after every write
//! to the cached aggregate.
//!
//! Concurrent misses for the same key each run the loader; the last write wins.
//! A load that was in flight when [`CacheAside::evict`] or [`CacheAside::clear`] ran
//! returns its value but does not cache it, so a write's eviction is never undone by
//! a read that started before the write.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    /// Bumped by every evict and clear.
    generation: AtomicU64,
}

/// A named cache region, cheap to clone and share between service handles.
#[derive(Debug, Clone)]
pub struct CacheAside<K, V> {
    name: String,
    ttl: Duration,
    entries: Arc<RwLock<HashMap<K, Entry<V>>>>,
    counters: Arc<Counters>,
}

impl<K, V> CacheAside<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new(name: impl Into<String>, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cached value, if present and not expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                trace!(cache = %self.name, ?key, "Cache hit");
                Some(entry.value.clone())
            }
            _ => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                trace!(cache = %self.name, ?key, "Cache miss");
                None
            }
        }
    }

    pub async fn put(&self, key: K, value: V) {
        let expires_at = Instant::now() + self.ttl;
        self.entries
            .write()
            .await
            .insert(key, Entry { value, expires_at });
    }

    /// Returns the cached value or runs `load`, caching a successful result.
    /// Errors are not cached.
    pub async fn get_or_load<E, F, Fut>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }
        let generation = self.counters.generation.load(Ordering::Acquire);
        let value = load().await?;

        let mut entries = self.entries.write().await;
        if self.counters.generation.load(Ordering::Acquire) == generation {
            let expires_at = Instant::now() + self.ttl;
            entries.insert(
                key,
                Entry {
                    value: value.clone(),
                    expires_at,
                },
            );
        } else {
            debug!(cache = %self.name, ?key, "Evicted during load, not caching");
        }
        Ok(value)
    }

    pub async fn evict(&self, key: &K) {
        let mut entries = self.entries.write().await;
        self.counters.generation.fetch_add(1, Ordering::AcqRel);
        if entries.remove(key).is_some() {
            debug!(cache = %self.name, ?key, "Evicted");
        }
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        self.counters.generation.fetch_add(1, Ordering::AcqRel);
        entries.clear();
        debug!(cache = %self.name, "Cleared");
    }

    /// Entries currently held, expired ones included until they are overwritten.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    async fn load_counted(calls: &AtomicU32, value: &str) -> Result<String, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_read_is_served_from_cache() {
        let cache = CacheAside::<u32, String>::new("users", Duration::from_secs(60));
        let calls = AtomicU32::new(0);

        let first = cache.get_or_load(1, || load_counted(&calls, "alice")).await;
        let second = cache.get_or_load(1, || load_counted(&calls, "changed")).await;

        assert_eq!(first.unwrap(), "alice");
        assert_eq!(second.unwrap(), "alice");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_forces_reload() {
        let cache = CacheAside::<u32, String>::new("users", Duration::from_secs(60));
        let calls = AtomicU32::new(0);

        cache.get_or_load(1, || load_counted(&calls, "alice")).await.unwrap();
        cache.evict(&1).await;
        let reloaded = cache.get_or_load(1, || load_counted(&calls, "alicia")).await;

        assert_eq!(reloaded.unwrap(), "alicia");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = CacheAside::<u32, String>::new("restaurants", Duration::from_secs(10));
        cache.put(7, "Pizza Place".into()).await;
        assert!(cache.get(&7).await.is_some());

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(cache.get(&7).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_errors_are_not_cached() {
        let cache = CacheAside::<u32, String>::new("users", Duration::from_secs(60));

        let failed: Result<String, String> =
            cache.get_or_load(3, || async { Err("down".to_string()) }).await;
        assert!(failed.is_err());
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_overtaken_by_evict_is_not_cached() {
        let cache = CacheAside::<u32, String>::new("users", Duration::from_secs(60));
        let (started_tx, started) = tokio::sync::oneshot::channel::<()>();
        let (release, gate) = tokio::sync::oneshot::channel::<()>();

        let reader = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .get_or_load(1, || async move {
                        let _ = started_tx.send(());
                        let _ = gate.await;
                        Ok::<_, String>("before update".to_string())
                    })
                    .await
            })
        };
        started.await.unwrap();

        // A write lands while the read is still loading.
        cache.evict(&1).await;
        release.send(()).unwrap();

        assert_eq!(reader.await.unwrap().unwrap(), "before update");
        assert!(cache.get(&1).await.is_none());

        let calls = AtomicU32::new(0);
        let fresh = cache.get_or_load(1, || load_counted(&calls, "after update")).await;
        assert_eq!(fresh.unwrap(), "after update");
        assert_eq!(cache.get(&1).await.as_deref(), Some("after update"));
    }
}
