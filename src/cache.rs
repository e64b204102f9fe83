// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Memoization of rendered badges keyed by the full render request.
//!
//! The cache sits in front of rate-limited, network-bound upstream calls.
//! The backing store is pluggable behind [`CacheStore`]: the in-process
//! [`MemoryCache`] suits single-instance deployments, while multi-instance
//! deployments can substitute a shared key/value store with identical
//! caller-visible behavior. Concurrent `set` calls for the same key race
//! with last-writer-wins semantics; the pipeline tolerates recomputing a
//! render, so no at-most-once-compute guarantee is provided.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant}
};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// Asynchronous key/value store with per-entry time-to-live.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the cached value for `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    async fn set(&self, key: &str, value: String, ttl: Duration);
}

/// Builds the composite cache key for a render request.
///
/// Every parameter that affects rendered output participates, so two
/// requests differing in any rendering-relevant parameter map to different
/// keys.
pub fn cache_key(
    kind: &str,
    subject: &str,
    metric: &str,
    style: &str,
    color: Option<&str>,
    icon: Option<&str>,
    animated: bool
) -> String {
    format!(
        "badge:{kind}:{subject}:{metric}:{style}:{}:{}:{animated}",
        color.unwrap_or("-"),
        icon.unwrap_or("-")
    )
}

struct Entry {
    value:      String,
    expires_at: Instant
}

/// In-process cache with lazy expiry.
///
/// Expired entries are treated as absent on access and removed
/// opportunistically; [`MemoryCache::purge_expired`] offers an active sweep
/// for the optional background task.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every expired entry and returns how many were evicted.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of live and expired entries currently held.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` when the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let expired = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false
            }
        };

        if expired {
            let mut entries = self.entries.write().await;
            if entries
                .get(key)
                .is_some_and(|entry| entry.expires_at <= Instant::now())
            {
                entries.remove(key);
            }
        }
        None
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl
        };
        self.entries.write().await.insert(key.to_owned(), entry);
    }
}

/// Spawns a periodic task that evicts expired entries.
///
/// Purely an optimization: lazy expiry already guarantees that an expired
/// entry is never returned.
pub fn spawn_cache_sweeper(
    cache: Arc<MemoryCache>,
    interval: Duration
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = cache.purge_expired().await;
            if evicted > 0 {
                debug!("cache sweep evicted {evicted} expired entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_returns_stored_value() {
        let cache = MemoryCache::new();
        cache
            .set("k", "rendered".to_owned(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("k").await.as_deref(), Some("rendered"));
    }

    #[tokio::test]
    async fn expired_entry_is_absent() {
        let cache = MemoryCache::new();
        cache
            .set("k", "rendered".to_owned(), Duration::from_millis(20))
            .await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.get("k").await, None);
        // The expired entry was removed on access.
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn missing_key_is_absent() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let cache = MemoryCache::new();
        cache.set("k", "old".to_owned(), Duration::from_secs(60)).await;
        cache.set("k", "new".to_owned(), Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn purge_removes_only_expired_entries() {
        let cache = MemoryCache::new();
        cache
            .set("short", "a".to_owned(), Duration::from_millis(10))
            .await;
        cache
            .set("long", "b".to_owned(), Duration::from_secs(60))
            .await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("long").await.as_deref(), Some("b"));
    }

    #[test]
    fn key_covers_every_render_parameter() {
        let base = cache_key("github", "octocat/demo", "stars", "flat", None, None, false);
        let with_color = cache_key(
            "github",
            "octocat/demo",
            "stars",
            "flat",
            Some("red"),
            None,
            false
        );
        let with_icon =
            cache_key("github", "octocat/demo", "stars", "flat", None, Some("star"), false);
        let animated = cache_key("github", "octocat/demo", "stars", "flat", None, None, true);
        let other_style = cache_key("github", "octocat/demo", "stars", "neon", None, None, false);

        assert_eq!(base, "badge:github:octocat/demo:stars:flat:-:-:false");
        for other in [&with_color, &with_icon, &animated, &other_style] {
            assert_ne!(&base, other);
        }
    }
}
