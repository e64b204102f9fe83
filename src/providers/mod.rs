// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Metric resolution: provider dispatch over heterogeneous upstreams.
//!
//! Every provider normalizes its data into a canonical string value so the
//! renderer only ever deals in text. Unknown metrics raise
//! [`Error::UnknownMetric`] uniformly across providers; the request boundary
//! is responsible for converting resolver failures into a fallback badge.

pub mod github;
pub mod pypi;
pub mod system;

use tracing::debug;

use crate::{
    error::Error,
    plugin::PluginRegistry,
    providers::{github::GithubProvider, pypi::PypiProvider}
};

/// Source of metric data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    /// Repository-hosting provider addressed by `owner/repo`.
    GitHub,
    /// Package-registry provider addressed by package name.
    PyPi,
    /// Dynamically registered plugin addressed by name.
    Plugin(String)
}

impl ProviderKind {
    /// Stable identifier used in cache keys and render-log records.
    pub fn key(&self) -> String {
        match self {
            Self::GitHub => "github".to_owned(),
            Self::PyPi => "pypi".to_owned(),
            Self::Plugin(name) => format!("plugin:{name}")
        }
    }
}

/// A metric lookup request: which provider, about what, asking for which
/// metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRequest {
    /// Provider to dispatch to.
    pub provider: ProviderKind,
    /// Subject identifier, e.g. `owner/repo` or a package name.
    pub subject:  String,
    /// Metric name to resolve.
    pub metric:   String
}

/// Dispatches metric requests to the configured providers.
pub struct MetricResolver {
    github:  GithubProvider,
    pypi:    PypiProvider,
    plugins: PluginRegistry
}

impl MetricResolver {
    /// Bundles the providers into one resolver.
    pub fn new(github: GithubProvider, pypi: PypiProvider, plugins: PluginRegistry) -> Self {
        Self {
            github,
            pypi,
            plugins
        }
    }

    /// Resolves a metric request to its canonical string value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMetric`] for metrics a provider does not
    /// define, [`Error::UnknownProvider`] for unregistered plugin names,
    /// [`Error::Upstream`] when a backing call fails, and [`Error::Config`]
    /// for malformed subjects.
    pub async fn resolve(&self, request: &MetricRequest) -> Result<String, Error> {
        debug!(
            "resolving {} metric {:?} for {:?}",
            request.provider.key(),
            request.metric,
            request.subject
        );
        match &request.provider {
            ProviderKind::GitHub => {
                let (owner, repo) = split_repository(&request.subject)?;
                self.github.metric(owner, repo, &request.metric).await
            }
            ProviderKind::PyPi => self.pypi.metric(&request.subject, &request.metric).await,
            ProviderKind::Plugin(name) => self.plugins.resolve(name, &request.metric).await
        }
    }

    /// Names of all registered plugins.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.names()
    }
}

fn split_repository(subject: &str) -> Result<(&str, &str), Error> {
    match subject.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => Ok((owner, repo)),
        _ => Err(Error::config(format!(
            "repository subject must be owner/repo, got {subject:?}"
        )))
    }
}
