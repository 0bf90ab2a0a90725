//! API Handlers
//!
//! HTTP request handlers serving group lookups and server status.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::cache::GroupRegistry;
use crate::error::{CacheError, Result};
use crate::models::{GroupStatsResponse, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// Holds the registry groups are looked up in and the name this node
/// reports in its request log.
#[derive(Clone)]
pub struct AppState {
    /// Groups served by this node
    pub registry: Arc<GroupRegistry>,
    /// Address or name identifying this node
    pub self_addr: Arc<str>,
}

impl AppState {
    /// Creates a new AppState over the given registry.
    pub fn new(registry: Arc<GroupRegistry>, self_addr: impl Into<String>) -> Self {
        Self {
            registry,
            self_addr: Arc::from(self_addr.into()),
        }
    }
}

/// Handler for GET <base-path>/<group>/<key>
///
/// Serves the group value for `key` as raw bytes. Everything after the
/// first `/` following the group name is the key.
pub async fn group_get_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Path(path): Path<String>,
) -> Result<Response> {
    info!("[server {}] {} {}", state.self_addr, method, uri.path());

    let (group_name, key) = path
        .split_once('/')
        .filter(|(group_name, _)| !group_name.is_empty())
        .ok_or_else(|| {
            CacheError::InvalidRequest(format!("expected <group>/<key>, got '{}'", path))
        })?;

    let group = state
        .registry
        .get_group(group_name)
        .ok_or_else(|| CacheError::NotFound(group_name.to_string()))?;

    // Getters are synchronous and may block on their data source
    let key = key.to_string();
    let value = tokio::task::spawn_blocking(move || group.get(&key))
        .await
        .map_err(|e| CacheError::Internal(format!("lookup task failed: {}", e)))??;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        value.to_vec(),
    )
        .into_response())
}

/// Response for paths no route matched.
///
/// Paths under `base_path` that lack a `<group>/<key>` part (`<base>`,
/// `<base>/`, `<base>//key`) are malformed lookups and answer 400; anything
/// else is a plain 404.
pub fn unmatched_path(base_path: &str, uri: &Uri) -> Response {
    let path = uri.path();
    let under_base = path
        .strip_prefix(base_path)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));

    if under_base {
        CacheError::InvalidRequest(format!("expected {}/<group>/<key>, got '{}'", base_path, path))
            .into_response()
    } else {
        CacheError::NotFound(format!("no route for '{}'", path)).into_response()
    }
}

/// Handler for GET /stats
///
/// Returns counters for every registered group.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let groups = state
        .registry
        .names()
        .into_iter()
        .filter_map(|name| state.registry.get_group(&name))
        .map(|group| GroupStatsResponse::new(group.name(), group.cache_bytes(), group.stats()))
        .collect();

    Json(StatsResponse { groups })
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn test_state() -> AppState {
        let registry = Arc::new(GroupRegistry::new());
        registry.new_group("scores", 2 << 10, |key: &str| -> anyhow::Result<Vec<u8>> {
            match key {
                "Tom" => Ok(b"630".to_vec()),
                _ => Err(anyhow::anyhow!("{} not exist", key)),
            }
        });
        AppState::new(registry, "localhost:9099")
    }

    async fn call(state: AppState, path: &str) -> Response {
        let uri: Uri = format!("/_suncache/{}", path).parse().unwrap();
        match group_get_handler(State(state), Method::GET, uri, Path(path.to_string())).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }

    #[tokio::test]
    async fn test_group_get_handler_hit() {
        let response = call(test_state(), "scores/Tom").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_group_get_handler_missing_separator() {
        let response = call(test_state(), "scores").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_group_get_handler_empty_key() {
        let response = call(test_state(), "scores/").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_group_get_handler_empty_group_name() {
        let response = call(test_state(), "/Tom").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_group_get_handler_unknown_group() {
        let response = call(test_state(), "nope/Tom").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_group_get_handler_getter_failure() {
        let response = call(test_state(), "scores/kkk").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unmatched_path_under_base_is_bad_request() {
        for path in ["/_suncache", "/_suncache/", "/_suncache//Tom"] {
            let uri: Uri = path.parse().unwrap();
            let response = unmatched_path("/_suncache", &uri);
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "path {}", path);
        }
    }

    #[test]
    fn test_unmatched_path_elsewhere_is_not_found() {
        for path in ["/", "/other", "/_suncacheX/scores/Tom"] {
            let uri: Uri = path.parse().unwrap();
            let response = unmatched_path("/_suncache", &uri);
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {}", path);
        }
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        call(state.clone(), "scores/Tom").await;
        call(state.clone(), "scores/Tom").await;

        let response = stats_handler(State(state)).await;
        assert_eq!(response.groups.len(), 1);
        assert_eq!(response.groups[0].name, "scores");
        assert_eq!(response.groups[0].stats.hits, 1);
        assert_eq!(response.groups[0].stats.loads, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
