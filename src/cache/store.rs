//! Cache Store Module
//!
//! Thread-safe wrapper around a lazily created LRU cache of byte views.

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{ByteView, CacheStats, LruCache, OnEvicted};

#[derive(Debug, Default)]
struct Inner {
    /// Created on the first add
    lru: Option<LruCache<ByteView>>,
    stats: CacheStats,
}

// == Cache Store ==
/// Serializes access to a single [`LruCache`].
///
/// The underlying cache is only allocated by the first [`CacheStore::add`];
/// a lookup before that is simply a miss. Every call holds the lock for its
/// whole duration, eviction included.
#[derive(Debug)]
pub struct CacheStore {
    /// Byte budget handed to the LRU cache, 0 = unbounded
    cache_bytes: usize,
    inner: Mutex<Inner>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store. No LRU cache is allocated yet.
    pub fn new(cache_bytes: usize) -> Self {
        Self {
            cache_bytes,
            inner: Mutex::new(Inner::default()),
        }
    }

    // == Add ==
    /// Stores a value, creating the LRU cache on first use.
    pub fn add(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();
        let cache_bytes = self.cache_bytes;
        inner
            .lru
            .get_or_insert_with(|| {
                debug!("Allocating LRU cache with budget of {} bytes", cache_bytes);
                let on_evicted: OnEvicted<ByteView> = Box::new(|key, value| {
                    debug!("Evicted key '{}' ({} bytes)", key, value.len());
                });
                LruCache::new(cache_bytes, Some(on_evicted))
            })
            .add(key, value);
    }

    // == Get ==
    /// Looks up a value. Misses when nothing has been added yet.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        let found = inner.lru.as_mut().and_then(|lru| lru.get(key).cloned());

        match found {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        found
    }

    // == Stats ==
    /// Returns hit/miss counters plus the current size of the cache.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        if let Some(lru) = inner.lru.as_ref() {
            stats.evictions = lru.evictions();
            stats.total_entries = lru.len();
            stats.used_bytes = lru.used_bytes();
        }
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().lru.as_ref().map_or(0, LruCache::len)
    }

    // == Is Empty ==
    /// Returns true when nothing is cached, including before the first add.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the LRU cache has been allocated.
    pub fn is_initialized(&self) -> bool {
        self.inner.lock().lru.is_some()
    }

    /// Byte budget of the underlying cache.
    pub fn cache_bytes(&self) -> usize {
        self.cache_bytes
    }
}
