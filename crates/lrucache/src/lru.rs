//! LRU engine: hash index plus an arena-backed recency list
//!
//! Entries live in a `Vec` of slots linked by index. Slots 0 and 1 are the
//! head (most recently used side) and tail (least recently used side)
//! sentinels and never hold an entry. Freed slots go on a free list and are
//! reused by the next insert.

use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

use ahash::RandomState;
use tracing::trace;

const HEAD: usize = 0;
const TAIL: usize = 1;

/// Upper bound on slots reserved up front; larger caches grow on demand
const PREALLOC_LIMIT: usize = 4096;

/// Slot in the recency list
struct Slot<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

impl<K, V> Slot<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: HEAD,
            next: TAIL,
        }
    }
}

/// What `LruCore::put` did
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PutOutcome<K> {
    /// Key was resident, value replaced
    Updated,
    /// New entry, no eviction needed
    Inserted,
    /// New entry, the returned key was evicted first
    Evicted(K),
}

/// Fixed-capacity LRU map
pub(crate) struct LruCore<K, V> {
    map: HashMap<K, usize, RandomState>,
    slots: Vec<Slot<K, V>>,
    free_list: Vec<usize>,
    capacity: NonZeroUsize,
}

impl<K, V> LruCore<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty engine holding at most `capacity` entries
    pub fn new(capacity: NonZeroUsize) -> Self {
        let prealloc = capacity.get().min(PREALLOC_LIMIT);
        let mut slots = Vec::with_capacity(prealloc + 2);
        slots.push(Slot::sentinel());
        slots.push(Slot::sentinel());

        Self {
            map: HashMap::with_capacity_and_hasher(prealloc, RandomState::new()),
            slots,
            free_list: Vec::new(),
            capacity,
        }
    }

    /// Look up a key and mark it most recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        self.value(idx)
    }

    /// Look up a key without touching recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.value(idx)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or update a key, evicting the LRU entry if the cache is full
    pub fn put(&mut self, key: K, value: V) -> PutOutcome<K> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some((_, v)) = &mut self.slots[idx].entry {
                *v = value;
            }
            self.move_to_front(idx);
            return PutOutcome::Updated;
        }

        // Evict before inserting so the map never exceeds capacity
        let evicted = if self.map.len() >= self.capacity.get() {
            self.evict()
        } else {
            None
        };

        let idx = self.alloc_slot(key.clone(), value);
        self.link_front(idx);
        self.map.insert(key, idx);

        match evicted {
            Some(old_key) => PutOutcome::Evicted(old_key),
            None => PutOutcome::Inserted,
        }
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        let (_, value) = self.free_slot(idx)?;
        trace!("Removed entry from slot {}", idx);
        Some(value)
    }

    /// Drop every entry; capacity is kept
    pub fn clear(&mut self) {
        self.map.clear();
        self.slots.truncate(2);
        self.slots[HEAD] = Slot::sentinel();
        self.slots[TAIL] = Slot::sentinel();
        self.free_list.clear();
    }

    /// Least recently used entry
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        let idx = self.slots[TAIL].prev;
        self.slots[idx].entry.as_ref().map(|(k, v)| (k, v))
    }

    /// Most recently used entry
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        let idx = self.slots[HEAD].next;
        self.slots[idx].entry.as_ref().map(|(k, v)| (k, v))
    }

    /// Iterate from most to least recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            cursor: self.slots[HEAD].next,
            remaining: self.map.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    fn value(&self, idx: usize) -> Option<&V> {
        self.slots[idx].entry.as_ref().map(|(_, v)| v)
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.slots[HEAD].next == idx {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    fn link_front(&mut self, idx: usize) {
        let first = self.slots[HEAD].next;
        self.slots[idx].prev = HEAD;
        self.slots[idx].next = first;
        self.slots[first].prev = idx;
        self.slots[HEAD].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }

    fn evict(&mut self) -> Option<K> {
        let idx = self.slots[TAIL].prev;
        if idx == HEAD {
            return None;
        }

        self.unlink(idx);
        let (key, _) = self.free_slot(idx)?;
        self.map.remove(&key);
        trace!("Evicted LRU entry from slot {}", idx);
        Some(key)
    }

    fn alloc_slot(&mut self, key: K, value: V) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx].entry = Some((key, value));
            idx
        } else {
            self.slots.push(Slot {
                entry: Some((key, value)),
                prev: HEAD,
                next: TAIL,
            });
            self.slots.len() - 1
        }
    }

    fn free_slot(&mut self, idx: usize) -> Option<(K, V)> {
        let entry = self.slots[idx].entry.take();
        self.free_list.push(idx);
        entry
    }

    /// Walk the list and check it against the index
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        use std::collections::HashSet;

        assert!(self.map.len() <= self.capacity.get(), "over capacity");
        assert!(self.slots[HEAD].entry.is_none() && self.slots[TAIL].entry.is_none());

        let mut seen = HashSet::new();
        let mut prev = HEAD;
        let mut cur = self.slots[HEAD].next;
        while cur != TAIL {
            let slot = &self.slots[cur];
            assert_eq!(slot.prev, prev, "broken back link at slot {}", cur);
            let (key, _) = slot.entry.as_ref().expect("linked slot without entry");
            assert!(seen.insert(key.clone()), "duplicate key in list");
            assert_eq!(self.map.get(key), Some(&cur), "index disagrees with list");
            prev = cur;
            cur = slot.next;
        }
        assert_eq!(self.slots[TAIL].prev, prev);
        assert_eq!(seen.len(), self.map.len(), "list and index sizes differ");
        assert_eq!(self.slots.len(), 2 + self.map.len() + self.free_list.len());
    }
}

/// Iterator over entries from most to least recently used
pub struct Iter<'a, K, V> {
    slots: &'a [Slot<K, V>],
    cursor: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == TAIL {
            return None;
        }
        let slot = &self.slots[self.cursor];
        self.cursor = slot.next;
        self.remaining = self.remaining.saturating_sub(1);
        slot.entry.as_ref().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
