//! Advisory notifications for cache observers (renderers, loggers)
//!
//! Events fire after the cache has finished its own bookkeeping. They are
//! fire-and-forget: the cache never waits on an observer and never looks at
//! what it does with an event.

use std::sync::mpsc::Sender;

/// Notification emitted by `LruCache`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent<K> {
    /// A `get` hit this key and made it most recently used
    Touched(K),
    /// A `put` evicted this key to make room
    Evicted(K),
}

impl<K> CacheEvent<K> {
    /// Key the event refers to
    pub fn key(&self) -> &K {
        match self {
            CacheEvent::Touched(k) | CacheEvent::Evicted(k) => k,
        }
    }
}

/// Receives cache notifications
pub trait CacheObserver<K> {
    /// Called after a successful `get`
    fn touched(&mut self, _key: &K) {}

    /// Called after a `put` evicted `key`
    fn evicted(&mut self, _key: &K) {}
}

/// No-op observer
impl<K> CacheObserver<K> for () {}

/// Forwards events over a channel. A dropped receiver is ignored.
impl<K: Clone> CacheObserver<K> for Sender<CacheEvent<K>> {
    fn touched(&mut self, key: &K) {
        let _ = self.send(CacheEvent::Touched(key.clone()));
    }

    fn evicted(&mut self, key: &K) {
        let _ = self.send(CacheEvent::Evicted(key.clone()));
    }
}
