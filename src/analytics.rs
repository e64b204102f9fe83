// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Append-only render log consumed in aggregate for popularity counts.
//!
//! The pipeline emits exactly one record per served badge request. Storage
//! is a collaborator behind the [`RenderLog`] trait; the bundled in-memory
//! implementation backs the analytics endpoint and tests, while deployments
//! with durable requirements can plug in a persistent store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

/// One served badge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderLogEntry {
    /// Request kind, e.g. `github`, `pypi`, `custom`, or a plugin name.
    pub kind:       String,
    /// Subject identifier, e.g. `owner/repo` or a custom label.
    pub identifier: String,
    /// Metric or value that was rendered.
    pub metric:     String,
    /// When the badge was served.
    pub timestamp:  DateTime<Utc>
}

/// Aggregate view over the render log.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    /// Total number of badges served.
    pub total_renders:   usize,
    /// Most requested metrics, descending, at most ten.
    pub popular_metrics: Vec<MetricCount>
}

/// A metric name with its render count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCount {
    /// Metric name.
    pub metric: String,
    /// Number of renders recorded for the metric.
    pub count:  usize
}

/// Append-only sink for render records.
#[async_trait]
pub trait RenderLog: Send + Sync {
    /// Records one served badge request.
    async fn record(&self, kind: &str, identifier: &str, metric: &str);

    /// Returns the aggregate summary used by the analytics endpoint.
    async fn summary(&self) -> AnalyticsSummary;
}

/// In-memory render log.
#[derive(Default)]
pub struct MemoryRenderLog {
    entries: Mutex<Vec<RenderLogEntry>>
}

impl MemoryRenderLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RenderLog for MemoryRenderLog {
    async fn record(&self, kind: &str, identifier: &str, metric: &str) {
        let entry = RenderLogEntry {
            kind:       kind.to_owned(),
            identifier: identifier.to_owned(),
            metric:     metric.to_owned(),
            timestamp:  Utc::now()
        };
        self.entries.lock().await.push(entry);
    }

    async fn summary(&self) -> AnalyticsSummary {
        let entries = self.entries.lock().await;
        let mut counts: Vec<MetricCount> = Vec::new();
        for entry in entries.iter() {
            match counts.iter_mut().find(|count| count.metric == entry.metric) {
                Some(count) => count.count += 1,
                None => counts.push(MetricCount {
                    metric: entry.metric.clone(),
                    count:  1
                })
            }
        }
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.metric.cmp(&b.metric)));
        counts.truncate(10);

        AnalyticsSummary {
            total_renders:   entries.len(),
            popular_metrics: counts
        }
    }
}
