// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Environment-driven service configuration.
//!
//! Every knob is exposed both as a CLI flag and an environment variable so
//! the binary runs unchanged in containers and on developer machines.

use std::time::Duration;

use clap::Parser;

use crate::providers::pypi::DEFAULT_PYPI_API_URL;

/// Runtime settings for the badge service.
#[derive(Debug, Clone, Parser)]
#[command(name = "badgecast", version, about = "Badge image generation proxy")]
pub struct Settings {
    /// Personal token attached to repository-hosting API calls. Optional;
    /// absence only reduces upstream rate limits.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Base URL override for the repository-hosting API.
    #[arg(long, env = "GITHUB_API_URL")]
    pub github_api_url: Option<String>,

    /// Base URL of the package-registry API.
    #[arg(long, env = "PYPI_API_URL", default_value = DEFAULT_PYPI_API_URL)]
    pub pypi_api_url: String,

    /// Time-to-live in seconds for cached rendered badges.
    #[arg(long, env = "CACHE_TTL", default_value_t = 300)]
    pub cache_ttl: u64,

    /// Seconds between background sweeps of expired cache entries; zero
    /// disables the sweeper.
    #[arg(long, env = "CACHE_SWEEP_INTERVAL", default_value_t = 3600)]
    pub cache_sweep_interval: u64,

    /// Per-call timeout in seconds for outbound provider requests.
    #[arg(long, env = "UPSTREAM_TIMEOUT", default_value_t = 10)]
    pub upstream_timeout: u64,

    /// Address the HTTP server binds to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16
}

impl Settings {
    /// Cache TTL as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Upstream per-call timeout as a [`Duration`].
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    /// Sweep interval as a [`Duration`], or `None` when disabled.
    pub fn cache_sweep_interval(&self) -> Option<Duration> {
        (self.cache_sweep_interval > 0)
            .then(|| Duration::from_secs(self.cache_sweep_interval))
    }

    /// Bind address in `host:port` form.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Settings;

    #[test]
    fn defaults_match_service_contract() {
        let settings = Settings::parse_from(["badgecast"]);
        assert_eq!(settings.cache_ttl, 300);
        assert_eq!(settings.upstream_timeout, 10);
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.pypi_api_url, "https://pypi.org");
        assert!(settings.github_token.is_none());
        assert!(settings.cache_sweep_interval().is_some());
    }

    #[test]
    fn flags_override_defaults() {
        let settings = Settings::parse_from([
            "badgecast",
            "--cache-ttl",
            "60",
            "--port",
            "9000",
            "--cache-sweep-interval",
            "0"
        ]);
        assert_eq!(settings.cache_ttl().as_secs(), 60);
        assert_eq!(settings.bind_address(), "0.0.0.0:9000");
        assert!(settings.cache_sweep_interval().is_none());
    }
}
