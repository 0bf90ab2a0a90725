//! Group Module
//!
//! A named cache namespace that loads missing keys through its getter.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{ByteView, CacheStats, CacheStore, Getter};
use crate::error::{CacheError, Result};

// == Group ==
/// A cache namespace bound to one data source.
///
/// Lookups are served from the group's own [`CacheStore`]; misses call the
/// [`Getter`] without holding any cache lock, so a slow source never blocks
/// hits on other keys. Concurrent misses on the same key each call the
/// getter, and the last write wins.
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: CacheStore,
    loads: AtomicU64,
    load_failures: AtomicU64,
}

impl Group {
    // == Constructor ==
    /// Creates a group with a byte budget of `cache_bytes` (0 = unbounded).
    pub fn new(name: impl Into<String>, cache_bytes: usize, getter: impl Getter + 'static) -> Self {
        Self::with_getter(name.into(), cache_bytes, Arc::new(getter))
    }

    /// Starts a builder for a group whose getter may not be known yet.
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder {
            name: name.into(),
            cache_bytes: 0,
            getter: None,
        }
    }

    fn with_getter(name: String, cache_bytes: usize, getter: Arc<dyn Getter>) -> Self {
        Self {
            name,
            getter,
            main_cache: CacheStore::new(cache_bytes),
            loads: AtomicU64::new(0),
            load_failures: AtomicU64::new(0),
        }
    }

    /// Returns the group's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the byte budget of the group's cache.
    pub fn cache_bytes(&self) -> usize {
        self.main_cache.cache_bytes()
    }

    // == Get ==
    /// Returns the value for `key`, loading it on a miss.
    ///
    /// # Errors
    /// - `InvalidRequest` if `key` is empty
    /// - `Load` carrying the getter's error untouched; nothing is cached
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("key is required".to_string()));
        }

        if let Some(value) = self.main_cache.get(key) {
            debug!(group = %self.name, "Cache hit for key '{}'", key);
            return Ok(value);
        }

        self.load(key)
    }

    // == Stats ==
    /// Returns the cache counters together with load outcomes.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.main_cache.stats();
        stats.loads = self.loads.load(Ordering::Relaxed);
        stats.load_failures = self.load_failures.load(Ordering::Relaxed);
        stats
    }

    /// Resolves a miss. Only the local getter is consulted; picking a remote
    /// owner for the key would happen here.
    fn load(&self, key: &str) -> Result<ByteView> {
        self.get_locally(key)
    }

    fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.getter.get(key) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.load_failures.fetch_add(1, Ordering::Relaxed);
                warn!(group = %self.name, "Failed to load key '{}': {}", key, err);
                return Err(CacheError::Load(err));
            }
        };

        self.loads.fetch_add(1, Ordering::Relaxed);
        info!(group = %self.name, "Loaded key '{}' ({} bytes)", key, bytes.len());

        let value = ByteView::new(&bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .finish_non_exhaustive()
    }
}

// == Group Builder ==
/// Builds a [`Group`], rejecting configurations without a getter.
pub struct GroupBuilder {
    name: String,
    cache_bytes: usize,
    getter: Option<Arc<dyn Getter>>,
}

impl GroupBuilder {
    /// Sets the byte budget (0 = unbounded, the default).
    pub fn cache_bytes(mut self, cache_bytes: usize) -> Self {
        self.cache_bytes = cache_bytes;
        self
    }

    /// Sets the data source.
    pub fn getter(mut self, getter: impl Getter + 'static) -> Self {
        self.getter = Some(Arc::new(getter));
        self
    }

    /// Sets an already shared data source, or clears it with `None`.
    pub fn shared_getter(mut self, getter: Option<Arc<dyn Getter>>) -> Self {
        self.getter = getter;
        self
    }

    /// Finishes the group.
    ///
    /// # Errors
    /// `Config` if no getter was supplied: such a group could never fill a miss.
    pub fn build(self) -> Result<Group> {
        let getter = self
            .getter
            .ok_or_else(|| CacheError::Config(format!("nil getter for group '{}'", self.name)))?;
        Ok(Group::with_getter(self.name, self.cache_bytes, getter))
    }
}
