// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Package-registry provider backed by the PyPI JSON API.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;

/// Default base URL of the package registry API.
pub const DEFAULT_PYPI_API_URL: &str = "https://pypi.org";

/// Top-level package payload returned by the registry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackagePayload {
    #[serde(default)]
    pub info: PackageInfo
}

/// Package metadata block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageInfo {
    #[serde(default)]
    pub version: Option<String>
}

/// Derives a package metric value from a decoded payload.
///
/// `downloads` deliberately returns the latest published version string: the
/// registry exposes no download counts, and the degenerate behavior of the
/// source system is preserved rather than silently redefined.
pub fn package_metric_value(metric: &str, payload: &PackagePayload) -> Result<String, Error> {
    match metric {
        "version" | "downloads" => Ok(payload
            .info
            .version
            .clone()
            .unwrap_or_else(|| "unknown".to_owned())),
        other => Err(Error::unknown_metric("pypi", other))
    }
}

/// PyPI-backed metric provider.
pub struct PypiProvider {
    client:   reqwest::Client,
    base_url: String
}

impl PypiProvider {
    /// Builds a provider against `base_url` with a per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::config(format!("failed to build pypi client: {error}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned()
        })
    }

    /// Resolves a package metric.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMetric`] for unrecognized metrics and
    /// [`Error::Upstream`] when the registry call fails.
    pub async fn metric(&self, package: &str, metric: &str) -> Result<String, Error> {
        // Reject unknown metrics before spending an upstream call.
        if !matches!(metric, "version" | "downloads") {
            return Err(Error::unknown_metric("pypi", metric));
        }

        debug!("resolving pypi metric {metric} for {package}");
        let url = format!("{}/pypi/{package}/json", self.base_url);
        let payload: PackagePayload = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        package_metric_value(metric, &payload)
    }
}
