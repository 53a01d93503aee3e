//! Zone aggregation and run summary statistics

use crate::models::{ProbeResult, ZoneStat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Zone key of a host: its last two dot-separated labels.
///
/// `graph.microsoft.com` → `microsoft.com`, `windows.cloud.microsoft` →
/// `cloud.microsoft`. Trailing dots are stripped first. A single-label host
/// is its own zone.
pub fn zone_of(host: &str) -> String {
    let host = host.trim_end_matches('.');
    let labels: Vec<&str> = host.split('.').collect();
    let start = labels.len().saturating_sub(2);
    labels[start..].join(".")
}

/// Groups probe results by zone and computes latency statistics per zone
#[derive(Debug, Default)]
pub struct ZoneAggregator {
    samples: BTreeMap<String, Vec<f64>>,
}

impl ZoneAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one result; failed or unmeasured results contribute nothing
    pub fn add(&mut self, result: &ProbeResult) {
        if let Some(latency) = result.sample() {
            if latency.is_finite() {
                self.samples.entry(result.zone()).or_default().push(latency);
            }
        }
    }

    /// Per-zone statistics, sorted by zone name. Zones without a single
    /// reachable, measured result are omitted.
    pub fn finish(self) -> Vec<ZoneStat> {
        self.samples
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(zone, mut values)| {
                // Summation order must not depend on arrival order
                values.sort_by(|a, b| a.total_cmp(b));
                let count = values.len();
                let min = values[0];
                let max = values[count - 1];
                let mean = values.iter().sum::<f64>() / count as f64;
                ZoneStat {
                    zone,
                    min,
                    max,
                    mean,
                    samples: count,
                }
            })
            .collect()
    }

    /// Aggregate a complete result set in one call
    pub fn aggregate(results: &[ProbeResult]) -> Vec<ZoneStat> {
        let mut aggregator = Self::new();
        for result in results {
            aggregator.add(result);
        }
        aggregator.finish()
    }
}

/// Headline counts for a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_hosts: usize,
    pub reachable: usize,
    pub failed: usize,
    /// Reachable hosts without a measured latency
    pub unmeasured: usize,
    pub success_rate: f64,
    /// Zone with the lowest mean latency
    pub fastest_zone: Option<String>,
    /// Zone with the highest mean latency
    pub slowest_zone: Option<String>,
}

impl RunSummary {
    pub fn from_results(results: &[ProbeResult], zones: &[ZoneStat]) -> Self {
        let total_hosts = results.len();
        let reachable = results.iter().filter(|r| r.is_reachable()).count();
        let unmeasured = results
            .iter()
            .filter(|r| r.is_reachable() && r.latency_ms.is_none())
            .count();
        let success_rate = if total_hosts > 0 {
            (reachable as f64 / total_hosts as f64) * 100.0
        } else {
            0.0
        };

        let fastest_zone = zones
            .iter()
            .min_by(|a, b| a.mean.total_cmp(&b.mean))
            .map(|z| z.zone.clone());
        let slowest_zone = zones
            .iter()
            .max_by(|a, b| a.mean.total_cmp(&b.mean))
            .map(|z| z.zone.clone());

        Self {
            total_hosts,
            reachable,
            failed: total_hosts - reachable,
            unmeasured,
            success_rate,
            fastest_zone,
            slowest_zone,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_of() {
        assert_eq!(zone_of("graph.microsoft.com"), "microsoft.com");
        assert_eq!(zone_of("windows.cloud.microsoft"), "cloud.microsoft");
        assert_eq!(zone_of("aka.ms"), "aka.ms");
        assert_eq!(zone_of("rdweb.wvd.microsoft.com"), "microsoft.com");
        assert_eq!(zone_of("localhost"), "localhost");
        assert_eq!(zone_of("ecs.office.com."), "office.com");
    }

    #[test]
    fn test_good_and_bad_example_scenario() {
        let results = vec![
            ProbeResult::reachable("good.example.com", 20.0, None),
            ProbeResult::failed("bad.example.com", "connection timed out after 5s"),
        ];

        let stats = ZoneAggregator::aggregate(&results);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].zone, "example.com");
        assert_eq!(stats[0].min, 20.0);
        assert_eq!(stats[0].max, 20.0);
        assert_eq!(stats[0].mean, 20.0);
        assert_eq!(stats[0].samples, 1);
    }

    #[test]
    fn test_min_max_mean_per_zone() {
        let results = vec![
            ProbeResult::reachable("login.microsoftonline.com", 40.0, None),
            ProbeResult::reachable("graph.microsoft.com", 10.0, None),
            ProbeResult::reachable("go.microsoft.com", 30.0, None),
            ProbeResult::reachable("learn.microsoft.com", 20.0, None),
        ];

        let stats = ZoneAggregator::aggregate(&results);
        assert_eq!(stats.len(), 2);

        let microsoft = stats.iter().find(|s| s.zone == "microsoft.com").unwrap();
        assert_eq!(microsoft.min, 10.0);
        assert_eq!(microsoft.max, 30.0);
        assert_eq!(microsoft.mean, 20.0);
        assert_eq!(microsoft.samples, 3);

        let online = stats.iter().find(|s| s.zone == "microsoftonline.com").unwrap();
        assert_eq!(online.samples, 1);
    }

    #[test]
    fn test_zone_without_samples_is_omitted() {
        let results = vec![
            ProbeResult::failed("ajax.aspnetcdn.com", "timed out"),
            ProbeResult::reachable_without_latency("aka.ms", "Ping succeeded"),
            ProbeResult::reachable("ecs.office.com", 12.5, None),
        ];

        let stats = ZoneAggregator::aggregate(&results);
        let zones: Vec<&str> = stats.iter().map(|s| s.zone.as_str()).collect();
        assert_eq!(zones, vec!["office.com"]);
    }

    #[test]
    fn test_all_failed_yields_empty_stats() {
        let results = vec![
            ProbeResult::failed("a.example.com", "refused"),
            ProbeResult::failed("b.example.org", "refused"),
        ];
        assert!(ZoneAggregator::aggregate(&results).is_empty());
        assert!(ZoneAggregator::aggregate(&[]).is_empty());
    }

    #[test]
    fn test_stats_sorted_by_zone() {
        let results = vec![
            ProbeResult::reachable("x.zeta.io", 1.0, None),
            ProbeResult::reachable("x.alpha.io", 1.0, None),
            ProbeResult::reachable("x.mid.io", 1.0, None),
        ];
        let zones: Vec<String> = ZoneAggregator::aggregate(&results)
            .into_iter()
            .map(|s| s.zone)
            .collect();
        assert_eq!(zones, vec!["alpha.io", "mid.io", "zeta.io"]);
    }

    #[test]
    fn test_run_summary() {
        let results = vec![
            ProbeResult::reachable("a.fast.com", 5.0, None),
            ProbeResult::reachable("b.slow.com", 250.0, None),
            ProbeResult::reachable_without_latency("c.ping.com", "Ping succeeded"),
            ProbeResult::failed("d.down.com", "refused"),
        ];
        let zones = ZoneAggregator::aggregate(&results);
        let summary = RunSummary::from_results(&results, &zones);

        assert_eq!(summary.total_hosts, 4);
        assert_eq!(summary.reachable, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.unmeasured, 1);
        assert_eq!(summary.success_rate, 75.0);
        assert_eq!(summary.fastest_zone.as_deref(), Some("fast.com"));
        assert_eq!(summary.slowest_zone.as_deref(), Some("slow.com"));
    }

    #[test]
    fn test_empty_run_summary() {
        let summary = RunSummary::from_results(&[], &[]);
        assert_eq!(summary.total_hosts, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert!(summary.fastest_zone.is_none());
    }
}
