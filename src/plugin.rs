// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Registry of trusted in-process metric plugins.
//!
//! Plugins are registered explicitly at start-up rather than discovered by
//! scanning the filesystem, so the set of providers is known at build time
//! and the registry is read-only once the server accepts traffic.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use crate::error::Error;

/// A metric provider exposing exactly one capability: resolving a metric
/// name to a string value.
#[async_trait]
pub trait MetricPlugin: Send + Sync {
    /// Name the plugin is addressed by in requests.
    fn name(&self) -> &str;

    /// Resolves `metric` to its current value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMetric`] for metrics the plugin does not
    /// define and [`Error::Upstream`] when the backing source fails.
    async fn metric(&self, metric: &str) -> Result<String, Error>;
}

/// Collection of plugins keyed by name, populated once at start-up.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn MetricPlugin>>
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin under its own name, replacing any previous plugin
    /// with the same name.
    pub fn register(&mut self, plugin: Arc<dyn MetricPlugin>) {
        self.plugins.insert(plugin.name().to_owned(), plugin);
    }

    /// Resolves `metric` through the plugin registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProvider`] when no plugin is registered under
    /// `name`; plugin-level failures propagate unchanged.
    pub async fn resolve(&self, name: &str, metric: &str) -> Result<String, Error> {
        match self.plugins.get(name) {
            Some(plugin) => plugin.metric(metric).await,
            None => Err(Error::unknown_provider(name))
        }
    }

    /// Returns the sorted names of all registered plugins.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
