//! LRU Cache Module
//!
//! Byte-bounded Least Recently Used store backing every group cache.

use std::collections::HashMap;
use std::fmt;

// == Value Trait ==
/// Anything stored in an [`LruCache`] reports how many bytes it occupies.
pub trait Value {
    /// Number of bytes accounted against the cache budget.
    fn size(&self) -> usize;
}

/// Callback invoked with each entry removed by eviction.
pub type OnEvicted<V> = Box<dyn FnMut(&str, &V) + Send>;

/// A slot in the recency list. Links are indices into `LruCache::nodes`.
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Cache ==
/// Key/value store bounded by bytes and ordered by recency.
///
/// Entries live in a slab of nodes forming a doubly-linked list where:
/// - Front (head) = Most recently used
/// - Back (tail) = Least recently used
///
/// Each entry is accounted as `key.len() + value.size()` bytes. A
/// `max_bytes` of 0 disables eviction entirely.
pub struct LruCache<V: Value> {
    /// Byte budget, 0 = unbounded
    max_bytes: usize,
    /// Bytes currently accounted
    used_bytes: usize,
    /// Node slab; `None` slots are listed in `free`
    nodes: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    /// Key -> slab index
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    /// Number of entries removed by eviction
    evictions: u64,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: Value> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache with the given byte budget.
    ///
    /// # Arguments
    /// * `max_bytes` - Maximum bytes to hold, 0 for no limit
    /// * `on_evicted` - Optional callback run for every evicted entry
    pub fn new(max_bytes: usize, on_evicted: Option<OnEvicted<V>>) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            nodes: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
            evictions: 0,
            on_evicted,
        }
    }

    // == Get ==
    /// Looks up a key and marks it as most recently used.
    ///
    /// Returns None on a miss without touching the recency order.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    // == Add ==
    /// Inserts or replaces a value and marks the key as most recently used.
    ///
    /// Afterwards the least recently used entries are evicted until the
    /// budget holds again. A value larger than the whole budget is accepted
    /// and then evicted by the same call.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(&key) {
            self.move_to_front(idx);
            if let Some(node) = self.nodes[idx].as_mut() {
                self.used_bytes = self.used_bytes - node.value.size() + value.size();
                node.value = value;
            }
        } else {
            self.used_bytes += key.len() + value.size();
            let idx = self.alloc(Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.push_front(idx);
            self.index.insert(key, idx);
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry.
    ///
    /// Accounting and the key index are updated before the eviction
    /// callback runs. Returns None if the cache is empty.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.tail?;
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free.push(idx);

        self.index.remove(&node.key);
        self.used_bytes -= node.key.len() + node.value.size();
        self.evictions += 1;

        if let Some(callback) = self.on_evicted.as_mut() {
            callback(&node.key, &node.value);
        }
        Some((node.key, node.value))
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    /// Returns true when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bytes currently accounted.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Byte budget, 0 = unbounded.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Entries removed by eviction since creation.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    // == Contains ==
    /// Checks for a key without changing its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Keys ==
    /// Returns keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            match self.nodes[idx].as_ref() {
                Some(node) => {
                    keys.push(node.key.clone());
                    cursor = node.next;
                }
                None => break,
            }
        }
        keys
    }

    // == List Plumbing ==
    fn alloc(&mut self, node: Node<V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_mut() {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.nodes[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.nodes[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(node) = self.nodes[h].as_mut() {
                    node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head != Some(idx) {
            self.unlink(idx);
            self.push_front(idx);
        }
    }

    /// Panics if the index, the list, and the byte accounting disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let keys = self.keys();
        assert_eq!(keys.len(), self.index.len(), "list and index length differ");

        let mut used = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.nodes[idx].as_ref().expect("list points at a free slot");
            assert_eq!(node.prev, prev, "broken back link");
            assert_eq!(self.index.get(&node.key), Some(&idx), "index out of sync");
            used += node.key.len() + node.value.size();
            prev = Some(idx);
            cursor = node.next;
        }
        assert_eq!(self.tail, prev, "tail does not end the list");
        assert_eq!(self.used_bytes, used, "byte accounting drifted");
    }
}

impl<V: Value> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.len())
            .field("evictions", &self.evictions)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct Text(&'static str);

    impl Value for Text {
        fn size(&self) -> usize {
            self.0.len()
        }
    }

    #[test]
    fn test_lru_new() {
        let lru: LruCache<Text> = LruCache::new(0, None);
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_lru_get_hit_and_miss() {
        let mut lru = LruCache::new(0, None);
        lru.add("key1", Text("1234"));

        assert_eq!(lru.get("key1"), Some(&Text("1234")));
        assert_eq!(lru.get("key2"), None);
        lru.assert_consistent();
    }

    #[test]
    fn test_lru_accounting() {
        let mut lru = LruCache::new(0, None);

        lru.add("a", Text("b"));
        assert_eq!(lru.used_bytes(), 2);

        lru.add("key", Text("value"));
        assert_eq!(lru.used_bytes(), 10);
        lru.assert_consistent();
    }

    #[test]
    fn test_lru_overwrite_adjusts_by_delta() {
        let mut lru = LruCache::new(0, None);

        lru.add("key1", Text("v"));
        lru.add("key2", Text("v"));
        lru.add("key1", Text("longer"));

        assert_eq!(lru.len(), 2);
        assert_eq!(lru.used_bytes(), 4 + 6 + 4 + 1);
        assert_eq!(lru.get("key1"), Some(&Text("longer")));
        // Overwrite promotes key1 to the front
        assert_eq!(lru.keys(), vec!["key1", "key2"]);
        lru.assert_consistent();
    }

    #[test]
    fn test_lru_remove_oldest() {
        let mut lru = LruCache::new(0, None);

        lru.add("key1", Text("value1"));
        lru.add("key2", Text("value2"));
        lru.add("key3", Text("value3"));

        let evicted = lru.remove_oldest();
        assert_eq!(evicted, Some(("key1".to_string(), Text("value1"))));
        assert_eq!(lru.len(), 2);
        assert_eq!(lru.used_bytes(), 20);
        assert!(!lru.contains("key1"));
        lru.assert_consistent();
    }

    #[test]
    fn test_lru_remove_oldest_empty() {
        let mut lru: LruCache<Text> = LruCache::new(10, None);
        assert_eq!(lru.remove_oldest(), None);
        assert_eq!(lru.evictions(), 0);
    }

    #[test]
    fn test_lru_eviction_on_budget() {
        let cap = "k1".len() + "k2".len() + "v1".len() + "v2".len();
        let mut lru = LruCache::new(cap, None);

        lru.add("k1", Text("v1"));
        lru.add("k2", Text("v2"));
        lru.add("k3", Text("v3"));

        assert_eq!(lru.len(), 2);
        assert!(!lru.contains("k1"));
        assert!(lru.used_bytes() <= cap);
        lru.assert_consistent();
    }

    #[test]
    fn test_lru_get_protects_from_eviction() {
        let mut lru = LruCache::new(8, None);

        lru.add("k1", Text("v1"));
        lru.add("k2", Text("v2"));
        lru.get("k1");
        lru.add("k3", Text("v3"));

        assert!(lru.contains("k1"));
        assert!(!lru.contains("k2"));
        assert!(lru.contains("k3"));
    }

    #[test]
    fn test_lru_get_protects_from_eviction_larger_budget() {
        let mut lru = LruCache::new(20, None);

        lru.add("k1", Text("value1"));
        lru.add("k2", Text("value2"));
        lru.get("k1");
        lru.add("k3", Text("value3"));

        assert_eq!(lru.keys(), vec!["k3", "k1"]);
        assert_eq!(lru.used_bytes(), 16);
    }

    #[test]
    fn test_lru_zero_budget_never_evicts() {
        let mut lru = LruCache::new(0, None);
        for key in ["a", "b", "c", "d", "e"] {
            lru.add(key, Text("0123456789"));
        }
        assert_eq!(lru.len(), 5);
        assert_eq!(lru.evictions(), 0);
    }

    #[test]
    fn test_lru_oversized_value_is_dropped_immediately() {
        let mut lru = LruCache::new(10, None);

        lru.add("a", Text("1"));
        lru.add("huge", Text("0123456789"));

        // Everything older goes first, then the oversized entry itself
        assert!(lru.is_empty());
        assert_eq!(lru.used_bytes(), 0);
        assert_eq!(lru.evictions(), 2);
        lru.assert_consistent();
    }

    #[test]
    fn test_lru_overwrite_can_trigger_eviction() {
        let mut lru = LruCache::new(10, None);

        lru.add("a", Text("1"));
        lru.add("b", Text("2"));
        lru.add("b", Text("22222222"));

        assert_eq!(lru.keys(), vec!["b"]);
        assert_eq!(lru.used_bytes(), 9);
    }

    #[test]
    fn test_lru_on_evicted_callback() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let callback: OnEvicted<Text> = Box::new(move |key, value| {
            sink.lock().unwrap().push((key.to_string(), value.0));
        });

        let mut lru = LruCache::new(10, Some(callback));
        lru.add("key1", Text("123456"));
        lru.add("k2", Text("k2"));
        lru.add("k3", Text("k3"));
        lru.add("k4", Text("k4"));

        assert_eq!(
            *evicted.lock().unwrap(),
            vec![("key1".to_string(), "123456"), ("k2".to_string(), "k2")]
        );
        assert_eq!(lru.evictions(), 2);
    }

    #[test]
    fn test_lru_survives_panicking_callback() {
        let callback: OnEvicted<Text> = Box::new(|key, _| {
            if key == "boom" {
                panic!("eviction callback failed for {}", key);
            }
        });

        let mut lru = LruCache::new(10, Some(callback));
        lru.add("boom", Text("12"));
        lru.add("k2", Text("ab"));

        let result = panic::catch_unwind(AssertUnwindSafe(|| lru.add("k3", Text("cd"))));
        assert!(result.is_err());

        lru.assert_consistent();
        assert!(!lru.contains("boom"));
        assert_eq!(lru.keys(), vec!["k3".to_string(), "k2".to_string()]);
        assert_eq!(lru.used_bytes(), 8);
        assert_eq!(lru.evictions(), 1);

        // Later evictions run normally
        lru.add("k4", Text("ef"));
        lru.assert_consistent();
        assert!(!lru.contains("k2"));
        assert_eq!(lru.get("k3").map(|v| v.0), Some("cd"));
        assert_eq!(lru.used_bytes(), 8);
    }

    #[test]
    fn test_lru_slots_are_reused() {
        let mut lru = LruCache::new(4, None);
        for i in 0..100 {
            lru.add(format!("k{}", i % 10), Text("v"));
        }
        assert!(lru.nodes.len() <= 2);
        lru.assert_consistent();
    }

    #[test]
    fn test_lru_keys_order_after_gets() {
        let mut lru = LruCache::new(0, None);

        lru.add("a", Text("1"));
        lru.add("b", Text("2"));
        lru.add("c", Text("3"));

        lru.get("a");
        lru.get("c");
        lru.get("b");

        // front=[b, c, a]=back
        assert_eq!(lru.keys(), vec!["b", "c", "a"]);
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("a".to_string()));
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("c".to_string()));
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("b".to_string()));
        assert!(lru.is_empty());
    }
}
