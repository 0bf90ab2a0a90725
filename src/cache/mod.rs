//! Cache Module
//!
//! Provides byte-bounded LRU caching organized into named groups that load
//! missing keys from a caller-supplied data source.

mod byteview;
mod getter;
mod group;
mod lru;
mod registry;
mod stats;
mod store;


// Re-export public types
pub use byteview::ByteView;
pub use getter::Getter;
pub use group::{Group, GroupBuilder};
pub use lru::{LruCache, OnEvicted, Value};
pub use registry::GroupRegistry;
pub use stats::CacheStats;
pub use store::CacheStore;
