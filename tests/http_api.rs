// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! End-to-end tests for the HTTP surface.
//!
//! Upstream providers point at an unroutable loopback port, so the
//! provider-backed endpoints exercise the fallback-badge boundary without
//! touching the network.

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode}
};
use badgecast::{
    AppState, GithubProvider, IconRegistry, MemoryCache, MemoryRenderLog, MetricResolver,
    PluginRegistry, PypiProvider, SystemMetrics, ThemeRegistry, router
};
use serde_json::Value;
use tower::ServiceExt;

const UNROUTABLE: &str = "http://127.0.0.1:1";

fn test_app() -> Router {
    let themes = ThemeRegistry::with_builtins();
    themes.validate().expect("built-in themes must validate");

    let github = GithubProvider::new(None, Some(UNROUTABLE), Duration::from_millis(500))
        .expect("github provider should build");
    let pypi = PypiProvider::new(UNROUTABLE, Duration::from_millis(500))
        .expect("pypi provider should build");
    let mut plugins = PluginRegistry::new();
    plugins.register(Arc::new(SystemMetrics::new()));

    let state = AppState {
        themes:     Arc::new(themes),
        icons:      Arc::new(IconRegistry::with_builtins()),
        resolver:   Arc::new(MetricResolver::new(github, pypi, plugins)),
        cache:      Arc::new(MemoryCache::new()),
        render_log: Arc::new(MemoryRenderLog::new()),
        cache_ttl:  Duration::from_secs(300)
    };
    router(state)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request should build")
        )
        .await
        .expect("request should not error");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    (status, headers, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}

#[tokio::test]
async fn custom_badge_renders_with_caching_headers() {
    let app = test_app();
    let (status, headers, body) = get(&app, "/badge/custom?label=Hello&value=World").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "image/svg+xml");
    assert_eq!(headers["cache-control"], "public, max-age=300");
    let etag = headers["etag"].to_str().expect("etag should be ascii");
    assert!(etag.starts_with('"') && etag.ends_with('"'));
    assert!(body.contains("Hello: World"));
    assert!(body.starts_with("<svg"));
}

#[tokio::test]
async fn custom_badge_escapes_markup_in_query_text() {
    let app = test_app();
    let (status, _, body) = get(&app, "/badge/custom?label=a%26b&value=%3C1%3E").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("a&amp;b: &lt;1&gt;"));
}

#[tokio::test]
async fn custom_badge_json_format_returns_fields() {
    let app = test_app();
    let (status, headers, body) =
        get(&app, "/badge/custom?label=build&value=ok&style=neon&format=json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-type"].to_str().expect("ascii").contains("application/json"));
    let payload: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(payload["label"], "build");
    assert_eq!(payload["value"], "ok");
    assert_eq!(payload["style"], "neon");
    assert_eq!(payload["animated"], false);
}

#[tokio::test]
async fn compose_lays_badges_out_horizontally() {
    let app = test_app();
    let (status, _, body) = get(&app, "/badge/compose?badges=a:1,b:2").await;

    assert_eq!(status, StatusCode::OK);
    // Two minimum-width badges: total 160, second group offset by 80.
    assert!(body.contains("width=\"160\""));
    assert!(body.contains("translate(0, 0)"));
    assert!(body.contains("translate(80, 0)"));
    assert!(body.contains("a: 1"));
    assert!(body.contains("b: 2"));
}

#[tokio::test]
async fn compose_defaults_missing_values_to_question_mark() {
    let app = test_app();
    let (status, _, body) = get(&app, "/badge/compose?badges=coverage").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("coverage: ?"));
}

#[tokio::test]
async fn compose_rejects_unknown_layout() {
    let app = test_app();
    let (status, _, body) = get(&app, "/badge/compose?badges=a:1&layout=diagonal").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let payload: Value = serde_json::from_str(&body).expect("json body");
    assert!(payload["error"].as_str().expect("error text").contains("diagonal"));
}

#[tokio::test]
async fn compose_supports_vertical_layout() {
    let app = test_app();
    let (status, _, body) = get(&app, "/badge/compose?badges=a:1,b:2&layout=vertical").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("height=\"40\""));
    assert!(body.contains("translate(0, 20)"));
}

#[tokio::test]
async fn failed_upstream_serves_fallback_badge_with_success_status() {
    let app = test_app();
    let (status, headers, body) = get(&app, "/badge/github/octocat/demo/stars").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "image/svg+xml");
    assert!(body.contains("error: unknown"));
    // Designated failure color.
    assert!(body.contains("#e05d44"));
}

#[tokio::test]
async fn failed_upstream_with_json_format_returns_error_object() {
    let app = test_app();
    let (status, _, body) = get(&app, "/badge/github/octocat/demo/stars?format=json").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let payload: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(payload["error"], "unknown");
}

#[tokio::test]
async fn unknown_plugin_metric_serves_fallback_badge() {
    let app = test_app();
    let (status, _, body) = get(&app, "/badge/plugin/system/nonsense").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("error: unknown"));
}

#[tokio::test]
async fn unregistered_plugin_serves_fallback_badge() {
    let app = test_app();
    let (status, _, body) = get(&app, "/badge/plugin/weather/temperature").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("error: unknown"));
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let app = test_app();
    let (status, _, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let payload: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(payload["status"], "healthy");
    assert!(payload["version"].as_str().is_some());
}

#[tokio::test]
async fn themes_endpoint_lists_registries() {
    let app = test_app();
    let (status, _, body) = get(&app, "/themes").await;

    assert_eq!(status, StatusCode::OK);
    let payload: Value = serde_json::from_str(&body).expect("json body");
    let themes = payload["themes"].as_array().expect("themes array");
    assert!(themes.iter().any(|name| name == "flat"));
    let plugins = payload["plugins"].as_array().expect("plugins array");
    assert!(plugins.iter().any(|name| name == "system"));
}

#[tokio::test]
async fn analytics_counts_served_badges() {
    let app = test_app();
    get(&app, "/badge/custom?label=a&value=1").await;
    get(&app, "/badge/custom?label=a&value=1").await;

    let (status, _, body) = get(&app, "/analytics").await;
    assert_eq!(status, StatusCode::OK);
    let payload: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(payload["total_renders"], 2);
    assert_eq!(payload["popular_metrics"][0]["metric"], "1");
    assert_eq!(payload["popular_metrics"][0]["count"], 2);
}

#[tokio::test]
async fn repeat_request_is_served_from_cache() {
    let app = test_app();
    let (_, first_headers, first_body) =
        get(&app, "/badge/custom?label=cached&value=yes").await;
    let (_, second_headers, second_body) =
        get(&app, "/badge/custom?label=cached&value=yes").await;

    assert_eq!(first_body, second_body);
    assert_eq!(first_headers["etag"], second_headers["etag"]);
}
