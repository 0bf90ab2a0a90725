//! API Module
//!
//! HTTP handlers and routing exposing group caches over the network.
//!
//! # Endpoints
//! - `GET <base_path>/<group>/<key>` - Fetch a value (loaded on miss)
//! - `GET /stats` - Per-group cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, DEFAULT_BASE_PATH};
