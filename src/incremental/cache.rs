//! Bounded LRU cache keyed by component identity.
//!
//! Two caps hold after every mutation: `len() <= max_entries` and
//! `byte_size() <= max_bytes`. Eviction always drops the least recently
//! touched entry. There is no time-based expiry.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::Serialize;

/// Computes the accounted size of a value.
pub type Sizer<V> = Box<dyn Fn(&V) -> usize + Send + Sync>;

/// Byte length of the value's JSON form; zero if it can't be serialized.
pub fn json_size<V: Serialize>(value: &V) -> usize {
    serde_json::to_vec(value).map(|bytes| bytes.len()).unwrap_or(0)
}

/// A cached value with its accounting metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub size: usize,
    /// Logical insertion tick (monotonic per cache).
    pub inserted_at: u64,
}

/// Statistics about cache usage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub insertions: u64,
}

impl CacheStats {
    /// Ratio of hits to lookups; zero before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Recency-ordered cache. The front of the map is the least recently
/// touched entry, the back the most recent.
pub struct LruCache<K, V> {
    entries: IndexMap<K, CacheEntry<V>>,
    max_entries: usize,
    max_bytes: usize,
    byte_size: usize,
    tick: u64,
    stats: CacheStats,
    sizer: Sizer<V>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq,
    V: Serialize + 'static,
{
    /// Create a cache that accounts values by their JSON byte length.
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        Self::with_sizer(max_entries, max_bytes, json_size::<V>)
    }
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq,
{
    pub fn with_sizer(
        max_entries: usize,
        max_bytes: usize,
        sizer: impl Fn(&V) -> usize + Send + Sync + 'static,
    ) -> Self {
        Self {
            entries: IndexMap::new(),
            max_entries,
            max_bytes,
            byte_size: 0,
            tick: 0,
            stats: CacheStats::default(),
            sizer: Box::new(sizer),
        }
    }

    /// Look up and mark as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(idx) = self.entries.get_index_of(key) else {
            self.stats.misses += 1;
            tracing::trace!("cache miss");
            return None;
        };
        self.stats.hits += 1;
        tracing::trace!("cache hit");
        let last = self.entries.len() - 1;
        self.entries.move_index(idx, last);
        self.entries.get_index(last).map(|(_, entry)| &entry.value)
    }

    /// Look up without touching recency or stats.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace, then evict until both caps hold.
    ///
    /// A value larger than `max_bytes` on its own is evicted right away.
    pub fn set(&mut self, key: K, value: V) {
        if let Some(old) = self.entries.shift_remove(&key) {
            self.byte_size -= old.size;
        }

        let size = (self.sizer)(&value);
        self.tick += 1;
        self.byte_size += size;
        self.stats.insertions += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                size,
                inserted_at: self.tick,
            },
        );
        self.evict();
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.entries.shift_remove(key)?;
        self.byte_size -= entry.size;
        Some(entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.byte_size = 0;
    }

    fn evict(&mut self) {
        while self.entries.len() > self.max_entries || self.byte_size > self.max_bytes {
            let Some((_, entry)) = self.entries.shift_remove_index(0) else {
                break;
            };
            self.byte_size -= entry.size;
            self.stats.evictions += 1;
            tracing::trace!(size = entry.size, "cache eviction");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of accounted entry sizes.
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Entries from least to most recently touched.
    pub fn entries(&self) -> impl Iterator<Item = (&K, &CacheEntry<V>)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<K: fmt::Debug, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .field("byte_size", &self.byte_size)
            .field("max_entries", &self.max_entries)
            .field("max_bytes", &self.max_bytes)
            .field("stats", &self.stats)
            .finish()
    }
}
