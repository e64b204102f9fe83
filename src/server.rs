// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! HTTP boundary for the badge pipeline.
//!
//! Handlers stay thin: they parse the request, consult the cache, delegate
//! to the resolver and renderer, and convert every resolver failure into a
//! renderable fallback badge. A broken upstream must never break the image:
//! the SVG path always answers with HTTP success and a valid document.

use std::{fmt::Write as _, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get
};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    analytics::{MemoryRenderLog, RenderLog},
    cache::{CacheStore, MemoryCache, cache_key},
    compose::{Layout, compose},
    config::Settings,
    error::Error,
    icon::IconRegistry,
    plugin::PluginRegistry,
    providers::{
        MetricRequest, MetricResolver, ProviderKind, github::GithubProvider, pypi::PypiProvider,
        system::SystemMetrics
    },
    render::{BadgeRequest, render},
    theme::{DEFAULT_THEME, ThemeRegistry}
};

/// Shared, read-mostly state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Theme registry, immutable after startup.
    pub themes:     Arc<ThemeRegistry>,
    /// Icon registry, immutable after startup.
    pub icons:      Arc<IconRegistry>,
    /// Provider dispatch for metric resolution.
    pub resolver:   Arc<MetricResolver>,
    /// Memoization cache for rendered badges.
    pub cache:      Arc<dyn CacheStore>,
    /// Append-only render log collaborator.
    pub render_log: Arc<dyn RenderLog>,
    /// TTL applied to cache entries and advertised in response headers.
    pub cache_ttl:  Duration
}

impl AppState {
    /// Wires the full pipeline from settings.
    ///
    /// Returns the state together with the concrete in-process cache so the
    /// caller can attach the optional background sweeper.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateMismatch`] when a registered theme fails
    /// validation and [`Error::Config`] when a provider client cannot be
    /// built. Both are startup failures; no traffic is served.
    pub fn from_settings(settings: &Settings) -> Result<(Self, Arc<MemoryCache>), Error> {
        let themes = ThemeRegistry::with_builtins();
        themes.validate()?;
        let icons = IconRegistry::with_builtins();

        let github = GithubProvider::new(
            settings.github_token.as_deref(),
            settings.github_api_url.as_deref(),
            settings.upstream_timeout()
        )?;
        let pypi = PypiProvider::new(&settings.pypi_api_url, settings.upstream_timeout())?;

        let mut plugins = PluginRegistry::new();
        plugins.register(Arc::new(SystemMetrics::new()));

        let cache = Arc::new(MemoryCache::new());
        let state = Self {
            themes:     Arc::new(themes),
            icons:      Arc::new(icons),
            resolver:   Arc::new(MetricResolver::new(github, pypi, plugins)),
            cache:      cache.clone(),
            render_log: Arc::new(MemoryRenderLog::new()),
            cache_ttl:  settings.cache_ttl()
        };
        Ok((state, cache))
    }
}

/// Output format selector shared by the badge endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeFormat {
    /// Vector-image document (default).
    #[default]
    Svg,
    /// Structured description of the same data.
    Json
}

fn default_style() -> String {
    DEFAULT_THEME.to_owned()
}

/// Query parameters accepted by the provider-backed badge endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct BadgeQuery {
    #[serde(default = "default_style")]
    pub style:    String,
    #[serde(default)]
    pub color:    Option<String>,
    #[serde(default)]
    pub icon:     Option<String>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub format:   BadgeFormat
}

// Not flattened into BadgeQuery: serde_urlencoded cannot drive bool and
// enum fields through a flattened struct.
#[derive(Debug, Deserialize)]
struct CustomQuery {
    label:    String,
    value:    String,
    #[serde(default = "default_style")]
    style:    String,
    #[serde(default)]
    color:    Option<String>,
    #[serde(default)]
    icon:     Option<String>,
    #[serde(default)]
    animated: bool,
    #[serde(default)]
    format:   BadgeFormat
}

fn default_layout() -> String {
    "horizontal".to_owned()
}

#[derive(Debug, Deserialize)]
struct ComposeQuery {
    /// Comma-delimited list of colon-separated `label:value` pairs.
    badges: String,
    #[serde(default = "default_layout")]
    layout: String,
    #[serde(default = "default_style")]
    style:  String
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/themes", get(list_themes))
        .route("/analytics", get(analytics))
        .route("/badge/custom", get(custom_badge))
        .route("/badge/compose", get(compose_badges))
        .route("/badge/github/:owner/:repo/:metric", get(github_badge))
        .route("/badge/pypi/:package/:metric", get(pypi_badge))
        .route("/badge/plugin/:plugin/:metric", get(plugin_badge))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the listener and serves the router until shutdown.
///
/// # Errors
///
/// Returns [`Error::Config`] when the address cannot be bound or the server
/// loop fails.
pub async fn serve(settings: &Settings, state: AppState) -> Result<(), Error> {
    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|error| Error::config(format!("failed to bind {address}: {error}")))?;
    info!("listening on {address}");
    axum::serve(listener, router(state))
        .await
        .map_err(|error| Error::config(format!("server error: {error}")))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn list_themes(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "themes": state.themes.names(),
        "icons": state.icons.names(),
        "plugins": state.resolver.plugin_names()
    }))
}

async fn analytics(State(state): State<AppState>) -> Response {
    Json(state.render_log.summary().await).into_response()
}

async fn github_badge(
    State(state): State<AppState>,
    Path((owner, repo, metric)): Path<(String, String, String)>,
    Query(query): Query<BadgeQuery>
) -> Response {
    metric_badge(
        state,
        ProviderKind::GitHub,
        format!("{owner}/{repo}"),
        metric,
        query
    )
    .await
}

async fn pypi_badge(
    State(state): State<AppState>,
    Path((package, metric)): Path<(String, String)>,
    Query(query): Query<BadgeQuery>
) -> Response {
    metric_badge(state, ProviderKind::PyPi, package, metric, query).await
}

async fn plugin_badge(
    State(state): State<AppState>,
    Path((plugin, metric)): Path<(String, String)>,
    Query(query): Query<BadgeQuery>
) -> Response {
    metric_badge(state, ProviderKind::Plugin(plugin.clone()), plugin, metric, query).await
}

async fn custom_badge(
    State(state): State<AppState>,
    Query(query): Query<CustomQuery>
) -> Response {
    state
        .render_log
        .record("custom", &query.label, &query.value)
        .await;

    if query.format == BadgeFormat::Json {
        return Json(json!({
            "label": query.label,
            "value": query.value,
            "style": query.style,
            "color": query.color,
            "icon": query.icon,
            "animated": query.animated
        }))
        .into_response();
    }

    let key = cache_key(
        "custom",
        &query.label,
        &query.value,
        &query.style,
        query.color.as_deref(),
        query.icon.as_deref(),
        query.animated
    );
    if let Some(hit) = state.cache.get(&key).await {
        return svg_response(state.cache_ttl, hit);
    }

    let request = BadgeRequest {
        label:    query.label,
        value:    query.value,
        style:    query.style.clone(),
        color:    query.color,
        icon:     query.icon,
        animated: query.animated
    };
    match render(&request, &state.themes, &state.icons) {
        Ok(badge) => {
            state
                .cache
                .set(&key, badge.svg.clone(), state.cache_ttl)
                .await;
            svg_response(state.cache_ttl, badge.svg)
        }
        Err(err) => {
            error!("render failed for custom badge: {err}");
            fallback_badge(&state, &query.style)
        }
    }
}

async fn compose_badges(
    State(state): State<AppState>,
    Query(query): Query<ComposeQuery>
) -> Response {
    let Some(layout) = Layout::parse(&query.layout) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("unknown layout {:?}", query.layout)}))
        )
            .into_response();
    };

    state
        .render_log
        .record("compose", &query.badges, &query.layout)
        .await;

    let mut rendered = Vec::new();
    for part in query.badges.split(',').filter(|part| !part.is_empty()) {
        let (label, value) = match part.split_once(':') {
            Some((label, value)) if !value.is_empty() => (label, value),
            Some((label, _)) => (label, "?"),
            None => (part, "?")
        };
        let mut request = BadgeRequest::new(label, value);
        request.style = query.style.clone();
        match render(&request, &state.themes, &state.icons) {
            Ok(badge) => rendered.push(badge),
            Err(err) => {
                error!("render failed for composed badge {label:?}: {err}");
                return fallback_badge(&state, &query.style);
            }
        }
    }

    svg_response(state.cache_ttl, compose(&rendered, layout))
}

async fn metric_badge(
    state: AppState,
    provider: ProviderKind,
    subject: String,
    metric: String,
    query: BadgeQuery
) -> Response {
    let kind = provider.key();
    state.render_log.record(&kind, &subject, &metric).await;

    let key = cache_key(
        &kind,
        &subject,
        &metric,
        &query.style,
        query.color.as_deref(),
        query.icon.as_deref(),
        query.animated
    );
    if query.format == BadgeFormat::Svg {
        if let Some(hit) = state.cache.get(&key).await {
            return svg_response(state.cache_ttl, hit);
        }
    }

    let request = MetricRequest {
        provider,
        subject: subject.clone(),
        metric: metric.clone()
    };
    let value = match state.resolver.resolve(&request).await {
        Ok(value) => value,
        Err(err) => {
            warn!("metric resolution failed for {kind}:{subject}:{metric}: {err}");
            if query.format == BadgeFormat::Json {
                return (StatusCode::NOT_FOUND, Json(json!({"error": "unknown"})))
                    .into_response();
            }
            return fallback_badge(&state, &query.style);
        }
    };

    if query.format == BadgeFormat::Json {
        return Json(json!({
            "provider": kind,
            "subject": subject,
            "metric": metric,
            "label": metric,
            "value": value,
            "style": query.style,
            "color": query.color,
            "icon": query.icon,
            "animated": query.animated
        }))
        .into_response();
    }

    let badge_request = BadgeRequest {
        label: metric,
        value,
        style: query.style.clone(),
        color: query.color,
        icon: query.icon,
        animated: query.animated
    };
    match render(&badge_request, &state.themes, &state.icons) {
        Ok(badge) => {
            state
                .cache
                .set(&key, badge.svg.clone(), state.cache_ttl)
                .await;
            svg_response(state.cache_ttl, badge.svg)
        }
        Err(err) => {
            error!("render failed for {kind}:{subject}: {err}");
            fallback_badge(&state, &query.style)
        }
    }
}

/// Renders the `error: unknown` badge served when resolution fails.
///
/// Keeps the HTTP status successful so embedding pages still show an image.
fn fallback_badge(state: &AppState, style: &str) -> Response {
    let mut request = BadgeRequest::new("error", "unknown");
    request.style = style.to_owned();
    request.color = Some("red".to_owned());
    match render(&request, &state.themes, &state.icons) {
        Ok(badge) => svg_response(state.cache_ttl, badge.svg),
        // Unreachable with a validated registry; answer with a bare document
        // rather than a fault.
        Err(err) => {
            error!("fallback badge failed to render: {err}");
            svg_response(
                state.cache_ttl,
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"80\" height=\"20\"/>"
                    .to_owned()
            )
        }
    }
}

fn svg_response(ttl: Duration, body: String) -> Response {
    let etag = format!("\"{}\"", content_fingerprint(&body));
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml".to_owned()),
            (header::ETAG, etag),
            (
                header::CACHE_CONTROL,
                format!("public, max-age={}", ttl.as_secs())
            )
        ],
        body
    )
        .into_response()
}

fn content_fingerprint(body: &str) -> String {
    let digest = Sha256::digest(body.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}
