//! LruCache: configurable LRU cache with stats and observer notifications

use std::hash::Hash;
use std::num::NonZeroUsize;

use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::lru::{Iter, LruCore, PutOutcome};
use crate::observer::CacheObserver;
use crate::stats::CacheStats;

/// Fixed-capacity LRU cache.
///
/// A new cache is unconfigured: every operation except `configure` fails
/// with `Error::NotConfigured` until a capacity has been set. `configure`
/// may be called again at any time to discard all entries and start over.
///
/// `get` and `put` run in O(1). `O` receives `touched`/`evicted`
/// notifications after each operation completes; the default `()` ignores
/// them.
pub struct LruCache<K, V, O = ()> {
    /// `None` until configured
    core: Option<LruCore<K, V>>,

    /// Notification sink
    observer: O,

    /// Cache statistics
    stats: CacheStats,
}

impl<K, V> LruCache<K, V> {
    /// Create an unconfigured cache with no observer
    pub fn new() -> Self {
        Self::with_observer(())
    }
}

impl<K, V> Default for LruCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache already configured with `capacity`
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut cache = Self::new();
        cache.configure(capacity)?;
        Ok(cache)
    }
}

impl<K, V, O> LruCache<K, V, O> {
    /// Create an unconfigured cache that reports to `observer`
    pub fn with_observer(observer: O) -> Self {
        Self {
            core: None,
            observer,
            stats: CacheStats::new(),
        }
    }

    /// Whether `configure` has succeeded at least once
    pub fn is_configured(&self) -> bool {
        self.core.is_some()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get the observer
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Get the observer mutably
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}

impl<K, V, O> LruCache<K, V, O>
where
    K: Hash + Eq + Clone,
    O: CacheObserver<K>,
{
    /// Set the capacity, discarding any existing entries and statistics
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, must be at least 1
    ///
    /// # Returns
    /// * `Result<()>` - `Error::InvalidConfiguration` for zero; the cache is
    ///   left exactly as it was
    pub fn configure(&mut self, capacity: usize) -> Result<()> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            warn!("Rejected cache capacity 0");
            Error::InvalidConfiguration { capacity: 0 }
        })?;
        self.install(capacity);
        Ok(())
    }

    /// Same as `configure`, taking the capacity from a `CacheConfig`
    pub fn configure_with(&mut self, config: &CacheConfig) -> Result<()> {
        let capacity = config.validate()?;
        self.install(capacity);
        Ok(())
    }

    fn install(&mut self, capacity: NonZeroUsize) {
        if let Some(old) = &self.core {
            debug!("Discarding {} entries on reconfigure", old.len());
        }
        self.core = Some(LruCore::new(capacity));
        self.stats.reset();
        debug!("Cache configured with capacity {}", capacity);
    }

    /// Look up `key` and mark it most recently used
    ///
    /// # Returns
    /// * `Result<Option<&V>>` - `None` when the key is absent; a miss
    ///   changes nothing
    pub fn get(&mut self, key: &K) -> Result<Option<&V>> {
        let core = self.core.as_mut().ok_or(Error::NotConfigured)?;
        match core.get(key) {
            Some(value) => {
                self.stats.record_hit();
                self.observer.touched(key);
                Ok(Some(value))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    /// Insert or update `key`, making it most recently used
    ///
    /// When the key is new and the cache is full, the least recently used
    /// entry is evicted first.
    ///
    /// # Returns
    /// * `Result<Option<K>>` - The evicted key, if any
    pub fn put(&mut self, key: K, value: V) -> Result<Option<K>> {
        let core = self.core.as_mut().ok_or(Error::NotConfigured)?;
        match core.put(key, value) {
            PutOutcome::Updated => {
                self.stats.record_update();
                Ok(None)
            }
            PutOutcome::Inserted => {
                self.stats.record_insert();
                Ok(None)
            }
            PutOutcome::Evicted(old) => {
                self.stats.record_insert();
                self.stats.record_eviction();
                self.observer.evicted(&old);
                Ok(Some(old))
            }
        }
    }

    /// Look up `key` without changing recency or notifying
    pub fn peek(&self, key: &K) -> Result<Option<&V>> {
        Ok(self.core()?.peek(key))
    }

    /// Check whether `key` is resident without changing recency
    pub fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.core()?.contains(key))
    }

    /// Remove `key`, returning its value
    pub fn remove(&mut self, key: &K) -> Result<Option<V>> {
        let core = self.core.as_mut().ok_or(Error::NotConfigured)?;
        Ok(core.remove(key))
    }

    /// Drop all entries; capacity and statistics are kept
    pub fn clear(&mut self) -> Result<()> {
        let core = self.core.as_mut().ok_or(Error::NotConfigured)?;
        debug!("Clearing {} entries", core.len());
        core.clear();
        Ok(())
    }

    /// Entry that the next eviction would remove
    pub fn peek_lru(&self) -> Result<Option<(&K, &V)>> {
        Ok(self.core()?.peek_lru())
    }

    /// Most recently touched entry
    pub fn peek_mru(&self) -> Result<Option<(&K, &V)>> {
        Ok(self.core()?.peek_mru())
    }

    /// Iterate from most to least recently used without touching recency
    pub fn iter(&self) -> Result<Iter<'_, K, V>> {
        Ok(self.core()?.iter())
    }

    /// Owned copy of the entries, most recently used first
    pub fn snapshot(&self) -> Result<Vec<(K, V)>>
    where
        V: Clone,
    {
        Ok(self
            .core()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    /// Number of resident entries (0 when unconfigured)
    pub fn len(&self) -> usize {
        self.core.as_ref().map_or(0, LruCore::len)
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity, `None` when unconfigured
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.core.as_ref().map(LruCore::capacity)
    }

    fn core(&self) -> Result<&LruCore<K, V>> {
        self.core.as_ref().ok_or(Error::NotConfigured)
    }
}
