//! API Routes
//!
//! Configures the Axum router serving groups under a base path.

use std::future::ready;

use axum::{http::Uri, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    group_get_handler, health_handler, stats_handler, unmatched_path, AppState,
};

/// Base path used when none is configured.
pub const DEFAULT_BASE_PATH: &str = "/_suncache";

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET <base_path>/<group>/<key>` - Value bytes for a key of a group
/// - `GET /stats` - Per-group statistics
/// - `GET /health` - Health check endpoint
///
/// `base_path` must start with `/` and not end with one; an empty value
/// falls back to [`DEFAULT_BASE_PATH`]. Malformed lookups under the base
/// path (`<base>/`, `<base>//key`) answer 400 rather than 404.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState, base_path: &str) -> Router {
    let base_path = if base_path.is_empty() {
        DEFAULT_BASE_PATH
    } else {
        base_path
    };
    let fallback_base = base_path.to_string();

    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(&format!("{}/*path", base_path), get(group_get_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .fallback(move |uri: Uri| ready(unmatched_path(&fallback_base, &uri)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
