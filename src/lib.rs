//! Connectivity Tester
//!
//! Probes a list of endpoints on port 443 for reachability and latency using
//! one of three interchangeable strategies (raw socket connect, an HTTP
//! request through an external tool, or ICMP ping), then groups the results
//! into per-zone latency statistics.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use executor::{CompletedRun, ProbeScheduler, RunRequest, RunSession};
pub use models::{Config, ProbeConfig, ProbeResult, ZoneStat};
pub use probe::{ProbeStrategy, StrategyFactory};
pub use stats::{zone_of, ZoneAggregator};
pub use types::{ConcurrencyPolicy, ProbeStatus, StrategyKind};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    /// Azure Virtual Desktop Remote Desktop client endpoints
    pub const DEFAULT_HOSTS: &[&str] = &[
        "login.microsoftonline.com",
        "rdweb.wvd.microsoft.com",
        "go.microsoft.com",
        "aka.ms",
        "learn.microsoft.com",
        "privacy.microsoft.com",
        "ajax.aspnetcdn.com",
        "graph.microsoft.com",
        "windows.cloud.microsoft",
        "windows365.microsoft.com",
        "ecs.office.com",
    ];
    pub const DEFAULT_PORT: u16 = 443;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_CONCURRENCY_LIMIT: usize = 10;
    pub const PING_ECHO_COUNT: u32 = 2;
    /// Hard ceiling on any single external tool invocation
    pub const TOOL_DEADLINE: Duration = Duration::from_secs(30);
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
