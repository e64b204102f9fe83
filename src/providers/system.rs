// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Local-system statistics exposed as a metric plugin.

use sysinfo::{Disks, System};
use tokio::sync::Mutex;

use crate::{error::Error, plugin::MetricPlugin};

/// Plugin resolving `cpu`, `memory`, and `disk` to percentage strings.
///
/// The [`System`] handle is kept behind a mutex because refreshing mutates
/// it; readings are cheap and requests for system badges are rare compared
/// to repository badges.
pub struct SystemMetrics {
    system: Mutex<System>
}

impl SystemMetrics {
    /// Creates the plugin with a fresh system handle.
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new())
        }
    }
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MetricPlugin for SystemMetrics {
    fn name(&self) -> &str {
        "system"
    }

    async fn metric(&self, metric: &str) -> Result<String, Error> {
        match metric {
            "cpu" => {
                let mut system = self.system.lock().await;
                // CPU usage needs two samples separated by the minimum
                // measurement interval.
                system.refresh_cpu_usage();
                tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
                system.refresh_cpu_usage();
                Ok(format_percent(system.global_cpu_usage() as f64))
            }
            "memory" => {
                let mut system = self.system.lock().await;
                system.refresh_memory();
                let total = system.total_memory();
                if total == 0 {
                    return Err(Error::upstream("total memory reported as zero"));
                }
                let used = system.used_memory();
                Ok(format_percent(used as f64 / total as f64 * 100.0))
            }
            "disk" => {
                let disks = Disks::new_with_refreshed_list();
                let total: u64 = disks.iter().map(|disk| disk.total_space()).sum();
                if total == 0 {
                    return Err(Error::upstream("no disks with reported capacity"));
                }
                let available: u64 = disks.iter().map(|disk| disk.available_space()).sum();
                let used = total.saturating_sub(available);
                Ok(format_percent(used as f64 / total as f64 * 100.0))
            }
            other => Err(Error::unknown_metric("system", other))
        }
    }
}

fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_formatting_keeps_one_decimal() {
        assert_eq!(format_percent(12.34), "12.3%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(100.0), "100.0%");
    }

    #[tokio::test]
    async fn unknown_metric_is_rejected() {
        let plugin = SystemMetrics::new();
        let error = plugin
            .metric("uptime")
            .await
            .expect_err("unknown metric must fail");
        assert!(matches!(error, Error::UnknownMetric { .. }));
    }

    #[tokio::test]
    async fn memory_metric_is_percentage_formatted() {
        let plugin = SystemMetrics::new();
        let value = plugin
            .metric("memory")
            .await
            .expect("memory reading should succeed");
        assert!(value.ends_with('%'), "expected percentage, got {value}");
        let numeric: f64 = value
            .trim_end_matches('%')
            .parse()
            .expect("numeric percentage");
        assert!((0.0..=100.0).contains(&numeric));
    }
}
