//! Consistent Hash Ring Module
//!
//! Maps keys to node identifiers using virtual nodes on a sorted hash ring.

use std::collections::HashMap;
use std::fmt;

/// Hash function used to place virtual nodes and keys on the ring.
pub type HashFn = fn(&[u8]) -> u32;

// == Hash Ring ==
/// A consistent hash ring.
///
/// Every real node owns `replicas` virtual nodes at
/// `hash("{i}{node}")` for `i` in `0..replicas`. A key belongs to the first
/// virtual node clockwise from its own hash, wrapping past the largest
/// position back to the smallest.
///
/// The ring has no internal locking. Build it up front and share it
/// immutably; mutation needs `&mut self`.
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual node positions, duplicates kept
    keys: Vec<u32>,
    /// Virtual node position -> real node
    hash_map: HashMap<u32, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring hashing with CRC32 (IEEE).
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32fast::hash)
    }

    /// Creates an empty ring with a custom hash function.
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            keys: Vec::new(),
            hash_map: HashMap::new(),
        }
    }

    // == Add ==
    /// Places `replicas` virtual nodes for each given node on the ring.
    ///
    /// Adding a node twice places its virtual nodes twice.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{}{}", i, node).as_bytes());
                self.keys.push(hash);
                self.hash_map.insert(hash, node.to_string());
            }
        }
        self.keys.sort_unstable();
    }

    // == Get ==
    /// Returns the node owning `key`, or None if the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&h| h < hash) % self.keys.len();
        self.hash_map.get(&self.keys[idx]).map(String::as_str)
    }

    /// Virtual nodes per real node.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    // == Length ==
    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    // == Is Empty ==
    /// Returns true when the ring holds no virtual nodes.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("virtual_nodes", &self.keys.len())
            .finish()
    }
}
