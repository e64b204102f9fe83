// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Repository-hosting provider backed by the GitHub REST API.
//!
//! Fetching is separated from derivation: the async methods perform one
//! HTTP call each through [`octocrab`] with a per-call timeout and no
//! automatic retries, while the tier classifications and date handling are
//! pure functions over the decoded payloads so they can be tested without a
//! network.

use std::time::Duration;

use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;

/// Fixed reference date for the `commit_frequency` metric.
///
/// Inherited from the source system: the metric counts commits since this
/// date, not a rolling window.
const COMMIT_FREQUENCY_SINCE: &str = "2023-01-01T00:00:00Z";

/// Repository summary fields used by the field-backed metrics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoInfo {
    #[serde(default)]
    pub stargazers_count:  u64,
    #[serde(default)]
    pub forks_count:       u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub subscribers_count: u64,
    #[serde(default)]
    pub size:              u64,
    #[serde(default)]
    pub license:           Option<LicenseInfo>
}

/// License block of the repository summary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LicenseInfo {
    #[serde(default)]
    pub spdx_id: Option<String>
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    commit: CommitDetail
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    committer: Option<CommitSignature>
}

#[derive(Debug, Deserialize)]
struct CommitSignature {
    date: String
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String
}

#[derive(Debug, Deserialize)]
struct WorkflowRuns {
    #[serde(default)]
    workflow_runs: Vec<WorkflowRun>
}

#[derive(Debug, Deserialize)]
struct WorkflowRun {
    conclusion: Option<String>
}

/// Classifies a star count into a trophy tier.
pub fn trophy_tier(stars: u64) -> &'static str {
    if stars >= 10_000 {
        "legendary"
    } else if stars >= 1_000 {
        "diamond"
    } else if stars >= 100 {
        "gold"
    } else if stars >= 50 {
        "silver"
    } else {
        "bronze"
    }
}

/// Classifies the combined stars+forks+issues score into an activity rank.
pub fn activity_rank(score: u64) -> &'static str {
    if score > 1_000 {
        "high"
    } else if score > 100 {
        "medium"
    } else {
        "low"
    }
}

/// Truncates an ISO-8601 timestamp at the time separator, keeping the date.
pub fn commit_date_only(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// Derives a field-backed metric value from a repository summary.
///
/// Returns `None` for metrics that require additional upstream calls.
pub fn repo_metric_value(metric: &str, info: &RepoInfo) -> Option<String> {
    match metric {
        "stars" => Some(info.stargazers_count.to_string()),
        "forks" => Some(info.forks_count.to_string()),
        "issues" | "open_issues" => Some(info.open_issues_count.to_string()),
        // Upstream "watchers" mirrors stars; the subscriber count is the
        // meaningful number.
        "watchers" => Some(info.subscribers_count.to_string()),
        "size" => Some(info.size.to_string()),
        "license" => Some(
            info.license
                .as_ref()
                .and_then(|license| license.spdx_id.clone())
                .unwrap_or_else(|| "none".to_owned())
        ),
        "activity_rank" => Some(
            activity_rank(info.stargazers_count + info.forks_count + info.open_issues_count)
                .to_owned()
        ),
        "trophy" => Some(trophy_tier(info.stargazers_count).to_owned()),
        _ => None
    }
}

/// GitHub-backed metric provider.
pub struct GithubProvider {
    client:  Octocrab,
    timeout: Duration
}

impl GithubProvider {
    /// Builds a provider with an optional personal token and an optional API
    /// base URL override.
    ///
    /// A missing token is not an error; unauthenticated calls simply run
    /// under reduced rate limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the underlying client cannot be built.
    pub fn new(
        token: Option<&str>,
        api_url: Option<&str>,
        timeout: Duration
    ) -> Result<Self, Error> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token.to_owned());
        }
        if let Some(url) = api_url {
            builder = builder
                .base_uri(url)
                .map_err(|error| Error::config(format!("invalid github api url: {error}")))?;
        }
        let client = builder
            .build()
            .map_err(|error| Error::config(format!("failed to build github client: {error}")))?;
        Ok(Self {
            client,
            timeout
        })
    }

    /// Resolves a repository metric for `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMetric`] for unrecognized metrics and
    /// [`Error::Upstream`] when the backing call fails or times out.
    pub async fn metric(&self, owner: &str, repo: &str, metric: &str) -> Result<String, Error> {
        debug!("resolving github metric {metric} for {owner}/{repo}");
        match metric {
            "stars" | "forks" | "issues" | "open_issues" | "watchers" | "size" | "license"
            | "activity_rank" | "trophy" => {
                let info: RepoInfo = self.fetch(&format!("/repos/{owner}/{repo}")).await?;
                repo_metric_value(metric, &info)
                    .ok_or_else(|| Error::unknown_metric("github", metric))
            }
            "open_prs" => {
                let pulls: Vec<Value> = self
                    .fetch(&format!("/repos/{owner}/{repo}/pulls?state=open"))
                    .await?;
                Ok(pulls.len().to_string())
            }
            "last_commit" => {
                let commits: Vec<CommitEntry> = self
                    .fetch(&format!("/repos/{owner}/{repo}/commits?per_page=1"))
                    .await?;
                Ok(commits
                    .first()
                    .and_then(|entry| entry.commit.committer.as_ref())
                    .map(|committer| commit_date_only(&committer.date).to_owned())
                    .unwrap_or_else(|| "unknown".to_owned()))
            }
            "contributors" => {
                // First page only. The API exposes no total, so this is a
                // deliberate approximation.
                let contributors: Vec<Value> = self
                    .fetch(&format!("/repos/{owner}/{repo}/contributors?per_page=1"))
                    .await?;
                Ok(contributors.len().to_string())
            }
            "release" => {
                let release: Option<Release> = self
                    .fetch_optional(&format!("/repos/{owner}/{repo}/releases/latest"))
                    .await?;
                Ok(release
                    .map(|release| release.tag_name)
                    .unwrap_or_else(|| "none".to_owned()))
            }
            "ci_status" => {
                let runs: Option<WorkflowRuns> = self
                    .fetch_optional(&format!("/repos/{owner}/{repo}/actions/runs?per_page=1"))
                    .await?;
                Ok(match runs {
                    Some(runs) => match runs.workflow_runs.first() {
                        Some(run) => run
                            .conclusion
                            .clone()
                            .unwrap_or_else(|| "unknown".to_owned()),
                        None => "no_runs".to_owned()
                    },
                    None => "unknown".to_owned()
                })
            }
            "commit_frequency" => {
                let commits: Vec<Value> = self
                    .fetch(&format!(
                        "/repos/{owner}/{repo}/commits?since={COMMIT_FREQUENCY_SINCE}"
                    ))
                    .await?;
                Ok(commits.len().to_string())
            }
            other => Err(Error::unknown_metric("github", other))
        }
    }

    async fn fetch<T>(&self, route: &str) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned
    {
        self.fetch_optional(route)
            .await?
            .ok_or_else(|| Error::upstream(format!("github resource not found: {route}")))
    }

    async fn fetch_optional<T>(&self, route: &str) -> Result<Option<T>, Error>
    where
        T: serde::de::DeserializeOwned
    {
        let outcome = tokio::time::timeout(self.timeout, self.client.get(route, None::<&()>))
            .await
            .map_err(|_| Error::upstream(format!("github request timed out: {route}")))?;

        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(error) if is_not_found(&error) => Ok(None),
            Err(error) => Err(error.into())
        }
    }
}

fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(stars: u64, forks: u64, issues: u64) -> RepoInfo {
        RepoInfo {
            stargazers_count: stars,
            forks_count: forks,
            open_issues_count: issues,
            ..RepoInfo::default()
        }
    }

    #[test]
    fn trophy_tiers_match_cutoffs() {
        assert_eq!(trophy_tier(10_000), "legendary");
        assert_eq!(trophy_tier(5_000), "diamond");
        assert_eq!(trophy_tier(1_000), "diamond");
        assert_eq!(trophy_tier(999), "gold");
        assert_eq!(trophy_tier(100), "gold");
        assert_eq!(trophy_tier(50), "silver");
        assert_eq!(trophy_tier(49), "bronze");
        assert_eq!(trophy_tier(0), "bronze");
    }

    #[test]
    fn activity_rank_matches_cutoffs() {
        assert_eq!(activity_rank(1_001), "high");
        assert_eq!(activity_rank(1_000), "medium");
        assert_eq!(activity_rank(101), "medium");
        assert_eq!(activity_rank(100), "low");
        assert_eq!(activity_rank(0), "low");
    }

    #[test]
    fn commit_date_truncates_at_time_separator() {
        assert_eq!(commit_date_only("2024-03-01T12:00:00Z"), "2024-03-01");
        assert_eq!(commit_date_only("2024-03-01"), "2024-03-01");
    }

    #[test]
    fn field_metrics_derive_from_repo_summary() {
        let info = RepoInfo {
            stargazers_count: 5_000,
            forks_count: 10,
            open_issues_count: 3,
            subscribers_count: 7,
            size: 2_048,
            license: Some(LicenseInfo {
                spdx_id: Some("MIT".to_owned())
            })
        };

        assert_eq!(repo_metric_value("stars", &info).as_deref(), Some("5000"));
        assert_eq!(repo_metric_value("forks", &info).as_deref(), Some("10"));
        assert_eq!(repo_metric_value("issues", &info).as_deref(), Some("3"));
        assert_eq!(repo_metric_value("open_issues", &info).as_deref(), Some("3"));
        assert_eq!(repo_metric_value("watchers", &info).as_deref(), Some("7"));
        assert_eq!(repo_metric_value("size", &info).as_deref(), Some("2048"));
        assert_eq!(repo_metric_value("license", &info).as_deref(), Some("MIT"));
        assert_eq!(repo_metric_value("trophy", &info).as_deref(), Some("diamond"));
        assert_eq!(
            repo_metric_value("activity_rank", &info).as_deref(),
            Some("high")
        );
    }

    #[test]
    fn missing_license_is_none_sentinel() {
        let info = repo(1, 1, 1);
        assert_eq!(repo_metric_value("license", &info).as_deref(), Some("none"));
    }

    #[test]
    fn unlisted_metric_is_not_field_backed() {
        let info = repo(0, 0, 0);
        assert_eq!(repo_metric_value("velocity", &info), None);
        assert_eq!(repo_metric_value("open_prs", &info), None);
    }

    #[test]
    fn repo_summary_decodes_from_partial_payload() {
        let info: RepoInfo = serde_json::from_str(
            r#"{"stargazers_count": 5000, "subscribers_count": 12, "unrelated": true}"#
        )
        .expect("partial payload should decode");
        assert_eq!(info.stargazers_count, 5_000);
        assert_eq!(info.subscribers_count, 12);
        assert_eq!(info.forks_count, 0);
        assert!(info.license.is_none());
    }

    #[tokio::test]
    async fn unknown_metric_fails_without_network() {
        let provider = GithubProvider::new(None, None, Duration::from_secs(1))
            .expect("provider should build");
        let error = provider
            .metric("octocat", "demo", "velocity")
            .await
            .expect_err("unknown metric must fail");
        assert!(matches!(error, Error::UnknownMetric { .. }));
    }
}
