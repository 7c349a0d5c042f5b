//! # lrucache
//!
//! Fixed-capacity key-value cache with strict LRU eviction.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to slot (O(1))
//! - **LRU List**: Doubly-linked list over a slot arena, with head/tail
//!   sentinels and a free list (O(1) relocate and evict)
//! - **LruCache**: Unconfigured/configured state machine, stats and
//!   `touched`/`evicted` notifications
//! - **SharedLruCache**: The whole cache behind one lock for multi-threaded use
//!
//! ## Example
//! ```
//! use lrucache::LruCache;
//!
//! let mut cache = LruCache::with_capacity(2)?;
//! cache.put("a", 1)?;
//! cache.put("b", 2)?;
//! cache.get(&"a")?;
//!
//! // "b" is now least recently used
//! assert_eq!(cache.put("c", 3)?, Some("b"));
//! assert_eq!(cache.get(&"b")?, None);
//! # Ok::<(), lrucache::Error>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod lru;
mod observer;
mod shared;
mod stats;

pub use cache::LruCache;
pub use config::{CacheConfig, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use lru::Iter;
pub use observer::{CacheEvent, CacheObserver};
pub use shared::SharedLruCache;
pub use stats::CacheStats;
