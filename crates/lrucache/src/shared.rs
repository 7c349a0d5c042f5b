//! Thread-safe wrapper around `LruCache`
//!
//! Every read reorders the recency list, so there is nothing to gain from a
//! reader/writer split: the whole cache sits behind one `Mutex` and each call
//! holds it for its full duration.

use std::hash::Hash;
use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::cache::LruCache;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::observer::CacheObserver;
use crate::stats::CacheStats;

/// `LruCache` behind a single lock, shareable across threads via `Arc`
pub struct SharedLruCache<K, V, O = ()> {
    inner: Mutex<LruCache<K, V, O>>,
}

impl<K, V> SharedLruCache<K, V> {
    /// Create an unconfigured shared cache
    pub fn new() -> Self {
        Self::with_observer(())
    }
}

impl<K, V> Default for SharedLruCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a shared cache already configured with `capacity`
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self::from_cache(LruCache::with_capacity(capacity)?))
    }
}

impl<K, V, O> SharedLruCache<K, V, O> {
    /// Create an unconfigured shared cache that reports to `observer`
    pub fn with_observer(observer: O) -> Self {
        Self::from_cache(LruCache::with_observer(observer))
    }

    /// Wrap an existing cache
    pub fn from_cache(cache: LruCache<K, V, O>) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }

    /// Unwrap back into a single-owner cache
    pub fn into_inner(self) -> LruCache<K, V, O> {
        self.inner.into_inner()
    }

    /// Run several operations under one lock acquisition
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LruCache<K, V, O>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    /// See `LruCache::is_configured`
    pub fn is_configured(&self) -> bool {
        self.inner.lock().is_configured()
    }

    /// Point-in-time copy of the statistics
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats().clone()
    }
}

impl<K, V, O> SharedLruCache<K, V, O>
where
    K: Hash + Eq + Clone,
    V: Clone,
    O: CacheObserver<K>,
{
    /// See `LruCache::configure`
    pub fn configure(&self, capacity: usize) -> Result<()> {
        self.inner.lock().configure(capacity)
    }

    /// See `LruCache::configure_with`
    pub fn configure_with(&self, config: &CacheConfig) -> Result<()> {
        self.inner.lock().configure_with(config)
    }

    /// Look up `key`, returning a copy of the value
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(self.inner.lock().get(key)?.cloned())
    }

    /// Insert or update `key`, returning the evicted key if any
    pub fn put(&self, key: K, value: V) -> Result<Option<K>> {
        self.inner.lock().put(key, value)
    }

    /// Look up `key` without changing recency
    pub fn peek(&self, key: &K) -> Result<Option<V>> {
        Ok(self.inner.lock().peek(key)?.cloned())
    }

    /// Check whether `key` is resident
    pub fn contains(&self, key: &K) -> Result<bool> {
        self.inner.lock().contains(key)
    }

    /// Remove `key`, returning its value
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        self.inner.lock().remove(key)
    }

    /// Drop all entries
    pub fn clear(&self) -> Result<()> {
        self.inner.lock().clear()
    }

    /// Entries from most to least recently used
    pub fn snapshot(&self) -> Result<Vec<(K, V)>> {
        self.inner.lock().snapshot()
    }

    /// Number of resident entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.inner.lock().capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Arc;
    use std::thread;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_is_send_sync() {
        assert_send_sync::<SharedLruCache<String, Vec<u8>>>();
    }

    #[test]
    fn test_shared_basic() {
        let cache = SharedLruCache::with_capacity(2).unwrap();

        cache.put("a".to_string(), 1).unwrap();
        cache.put("b".to_string(), 2).unwrap();
        assert_eq!(cache.get(&"a".to_string()), Ok(Some(1)));
        assert_eq!(cache.put("c".to_string(), 3), Ok(Some("b".to_string())));
        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.snapshot().unwrap(),
            vec![("c".to_string(), 3), ("a".to_string(), 1)]
        );
    }

    #[test]
    fn test_shared_not_configured() {
        let cache: SharedLruCache<u32, u32> = SharedLruCache::new();
        assert_eq!(cache.get(&1), Err(Error::NotConfigured));
        assert_eq!(cache.put(1, 1), Err(Error::NotConfigured));

        cache.configure(1).unwrap();
        assert_eq!(cache.put(1, 1), Ok(None));
    }

    #[test]
    fn test_shared_with_lock() {
        let cache = SharedLruCache::with_capacity(3).unwrap();

        let evicted = cache.with_lock(|c| -> Result<Option<i32>> {
            c.put(1, 'a')?;
            c.put(2, 'b')?;
            c.get(&1)?;
            c.put(3, 'c')?;
            c.put(4, 'd')
        });
        assert_eq!(evicted, Ok(Some(2)));

        let cache = cache.into_inner();
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_shared_concurrent_puts() {
        let cache = Arc::new(SharedLruCache::with_capacity(16).unwrap());

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..500u64 {
                        let key = (t * 1000 + i) % 64;
                        cache.put(key, i).unwrap();
                        cache.get(&key).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 16);
        let stats = cache.stats();
        assert_eq!(stats.inserts() + stats.updates(), 2000);
        assert_eq!(stats.evictions(), stats.inserts() - 16);

        let snapshot = cache.snapshot().unwrap();
        let mut keys: Vec<_> = snapshot.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 16);
    }
}
