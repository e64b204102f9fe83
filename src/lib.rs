// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Badge-image generation proxy.
//!
//! The crate resolves metrics about external subjects (repositories,
//! packages, or local-system statistics), renders them into themed SVG
//! badges, and memoizes the rendered artifacts with a time-to-live. The
//! rendering pipeline is pure and synchronous; resolution is asynchronous
//! and network-bound; the HTTP layer in [`server`] converts every resolver
//! failure into a renderable fallback badge.

pub mod analytics;
pub mod cache;
pub mod compose;
pub mod config;
pub mod error;
pub mod escape;
pub mod icon;
pub mod plugin;
pub mod providers;
pub mod render;
pub mod server;
pub mod theme;

pub use analytics::{AnalyticsSummary, MemoryRenderLog, MetricCount, RenderLog, RenderLogEntry};
pub use cache::{CacheStore, MemoryCache, cache_key, spawn_cache_sweeper};
pub use compose::{Layout, compose};
pub use config::Settings;
pub use error::Error;
pub use escape::escape_markup;
pub use icon::IconRegistry;
pub use plugin::{MetricPlugin, PluginRegistry};
pub use providers::{
    MetricRequest, MetricResolver, ProviderKind, github::GithubProvider, pypi::PypiProvider,
    system::SystemMetrics
};
pub use render::{
    BadgeRequest, RenderedBadge, badge_width, color_band, palette_hex, render,
    resolve_background
};
pub use server::{AppState, BadgeFormat, BadgeQuery, router, serve};
pub use theme::{DEFAULT_THEME, Theme, ThemeRegistry};
