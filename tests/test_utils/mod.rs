//! Test utilities for integration tests
#![allow(dead_code)]
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response};
use serde_json::Value;
use tower::util::ServiceExt;

use toolshed::api::AppState;
use toolshed::api::app;
use toolshed::cache::MemoryCache;
use toolshed::core::{AppConfig, CacheBackend};

/// Nothing listens here, so any upstream call a test didn't mock
/// fails fast.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Config with every upstream pointed at `upstream_url` and an API key
/// set. Tests override individual fields as needed.
pub fn test_config(upstream_url: &str) -> AppConfig {
    AppConfig {
        holiday_api_url: upstream_url.to_string(),
        holiday_api_key: Some(String::from("test-key")),
        holiday_cache_ttl: Duration::from_secs(60),
        ip_geo_api_url: Some(upstream_url.to_string()),
        weather_api_url: upstream_url.to_string(),
        weather_cache_ttl: Duration::from_secs(60),
        cache_backend: CacheBackend::Memory,
        cache_rest_url: None,
        cache_rest_token: None,
        cache_key_prefix: String::from("toolshed-test:"),
        public_site_url: String::from("http://localhost:2222"),
    }
}

/// Creates a test application router with a fresh in-memory cache.
///
/// Tests that start a mock server should still be marked `#[serial]`
/// so mock expectations from one test don't interleave with another.
pub async fn test_app() -> Router {
    test_app_with(test_config(UNREACHABLE)).await
}

pub async fn test_app_with(config: AppConfig) -> Router {
    let cache = Arc::new(MemoryCache::default());
    let app_state = AppState::with_cache(config, cache);
    app(Arc::new(app_state))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
