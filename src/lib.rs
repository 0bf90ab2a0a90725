//! Sun Cache - A byte-bounded group cache
//!
//! Provides LRU caches organized into named groups that load missing keys
//! from a caller-supplied data source, a consistent-hash ring for picking
//! the node that owns a key, and an HTTP API serving groups.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod ring;

pub use api::{create_router, AppState};
pub use cache::{ByteView, Getter, Group, GroupRegistry};
pub use config::Config;
pub use error::{CacheError, Result};
pub use ring::HashRing;
