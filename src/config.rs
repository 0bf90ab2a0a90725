//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::api::DEFAULT_BASE_PATH;

const DEFAULT_PORT: u16 = 9099;
const DEFAULT_CACHE_BYTES: usize = 2 << 10;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Path prefix under which groups are served
    pub base_path: String,
    /// Byte budget of the demonstration group (0 = unbounded)
    pub cache_bytes: usize,
    /// Name this node reports in request logs
    pub server_name: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 9099)
    /// - `BASE_PATH` - Path prefix for group lookups (default: /_suncache)
    /// - `CACHE_BYTES` - Byte budget per group (default: 2048)
    /// - `SERVER_NAME` - Node name for logs (default: localhost:<port>)
    pub fn from_env() -> Self {
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            server_port,
            base_path: env::var("BASE_PATH")
                .ok()
                .map(|v| normalize_base_path(&v))
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_BYTES),
            server_name: env::var("SERVER_NAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| format!("localhost:{}", server_port)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
            cache_bytes: DEFAULT_CACHE_BYTES,
            server_name: format!("localhost:{}", DEFAULT_PORT),
        }
    }
}

/// Ensures a single leading slash and no trailing slash.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
