//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Terminal state of a single host probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeStatus {
    /// The host answered within the timeout
    Reachable,
    /// The probe failed (timeout, refusal, DNS, tool error)
    Failed,
}

impl ProbeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Reachable => "Reachable",
            ProbeStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probing mechanism used for every host of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Raw TCP connect to host:port
    Socket,
    /// HTTPS request through an external HTTP tool (curl)
    #[value(alias = "curl")]
    Tool,
    /// ICMP echo through the system ping binary
    Ping,
}

impl StrategyKind {
    /// Get a human-readable name for this strategy
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Socket => "Socket",
            StrategyKind::Tool => "Curl",
            StrategyKind::Ping => "Ping",
        }
    }

    /// Whether proxy and header settings have any effect on this strategy
    pub fn uses_request_options(&self) -> bool {
        matches!(self, StrategyKind::Tool)
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        Self::Socket
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "socket" | "tcp" => Ok(StrategyKind::Socket),
            "tool" | "curl" => Ok(StrategyKind::Tool),
            "ping" | "icmp" => Ok(StrategyKind::Ping),
            other => Err(AppError::parse(format!(
                "Unknown probe strategy '{}' (expected socket, tool/curl or ping)",
                other
            ))),
        }
    }
}

/// How many probes the scheduler may run at the same time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyPolicy {
    /// Launch every host at once; bounded only by the host count
    Unbounded,
    /// At most this many probes in flight; the rest queue for a free slot
    Bounded(usize),
}

impl ConcurrencyPolicy {
    /// Effective number of simultaneous probes for a batch of `hosts`
    pub fn slots_for(&self, hosts: usize) -> usize {
        match self {
            ConcurrencyPolicy::Unbounded => hosts.max(1),
            ConcurrencyPolicy::Bounded(limit) => (*limit).max(1),
        }
    }
}

impl fmt::Display for ConcurrencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyPolicy::Unbounded => f.write_str("unbounded"),
            ConcurrencyPolicy::Bounded(limit) => write!(f, "{} workers", limit),
        }
    }
}

/// Report format for the run output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and latency chart
    Table,
    /// Machine-readable run report
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::parse(format!("Unknown output format '{}'", other))),
        }
    }
}
