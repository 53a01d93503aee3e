//! Probe result and zone statistic data models

use crate::types::ProbeStatus;
use serde::{Deserialize, Serialize};

/// Normalized outcome of probing one host, shared by every strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Fully-qualified domain name that was tested
    pub host: String,

    /// Terminal state of the probe
    pub status: ProbeStatus,

    /// Measured latency in milliseconds; never set on a failed probe
    pub latency_ms: Option<f64>,

    /// Cause of failure, or an annotation on success
    pub detail: Option<String>,
}

impl ProbeResult {
    /// A reachable host with a measured latency
    pub fn reachable(host: impl Into<String>, latency_ms: f64, detail: Option<String>) -> Self {
        Self {
            host: host.into(),
            status: ProbeStatus::Reachable,
            latency_ms: Some(latency_ms),
            detail,
        }
    }

    /// A reachable host whose latency could not be extracted
    pub fn reachable_without_latency(host: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            status: ProbeStatus::Reachable,
            latency_ms: None,
            detail: Some(detail.into()),
        }
    }

    /// A failed probe; latency is always absent
    pub fn failed(host: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            status: ProbeStatus::Failed,
            latency_ms: None,
            detail: Some(detail.into()),
        }
    }

    /// Check if the host was reachable
    pub fn is_reachable(&self) -> bool {
        self.status == ProbeStatus::Reachable
    }

    /// Latency usable for zone statistics (reachable and measured)
    pub fn sample(&self) -> Option<f64> {
        match self.status {
            ProbeStatus::Reachable => self.latency_ms,
            ProbeStatus::Failed => None,
        }
    }

    /// Zone key of this result's host
    pub fn zone(&self) -> String {
        crate::stats::zone_of(&self.host)
    }
}

/// Latency statistics for one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStat {
    /// Last two dot-separated labels of the hosts in this zone
    pub zone: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Number of reachable, measured results that contributed
    pub samples: usize,
}

/// Round a millisecond value to two decimal places
pub fn round_ms(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a latency so that whole numbers keep one decimal ("123.0"), as the
/// tool strategy's detail string expects
pub fn format_ms(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_has_no_latency() {
        let result = ProbeResult::failed("bad.example.com", "connection timed out");
        assert_eq!(result.status, ProbeStatus::Failed);
        assert!(result.latency_ms.is_none());
        assert!(result.sample().is_none());
        assert_eq!(result.detail.as_deref(), Some("connection timed out"));
    }

    #[test]
    fn test_reachable_result() {
        let result = ProbeResult::reachable("good.example.com", 20.0, None);
        assert!(result.is_reachable());
        assert_eq!(result.sample(), Some(20.0));
        assert!(result.detail.is_none());
        assert_eq!(result.zone(), "example.com");
    }

    #[test]
    fn test_reachable_without_latency_is_not_a_sample() {
        let result = ProbeResult::reachable_without_latency("aka.ms", "Ping succeeded");
        assert!(result.is_reachable());
        assert!(result.sample().is_none());
    }

    #[test]
    fn test_round_ms() {
        assert_eq!(round_ms(0.123 * 1000.0), 123.0);
        assert_eq!(round_ms(12.3456), 12.35);
        assert_eq!(round_ms(7.001), 7.0);
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(123.0), "123.0");
        assert_eq!(format_ms(45.67), "45.67");
        assert_eq!(format_ms(0.5), "0.5");
    }

    #[test]
    fn test_result_serialization() {
        let result = ProbeResult::reachable("graph.microsoft.com", 31.25, Some("31.25 ms".to_string()));
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"status\":\"Reachable\""));
        assert!(json.contains("\"latency_ms\":31.25"));
    }
}
