//! Configuration data model and validation

use crate::types::{AppError, ConcurrencyPolicy, OutputFormat, Result, StrategyKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Immutable settings shared by every probe of a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Destination port on every host
    pub port: u16,

    /// Probing mechanism used for the whole run
    pub strategy: StrategyKind,

    /// Proxy URL; only the tool strategy honours it
    pub proxy: Option<String>,

    /// Extra request headers, in input order; only the tool strategy honours them
    pub headers: Vec<(String, String)>,

    /// Per-probe connect timeout
    pub timeout: Duration,

    /// Number of probes allowed in flight at once
    pub concurrency: ConcurrencyPolicy,
}

impl ProbeConfig {
    /// Create a probe configuration with defaults for the given strategy
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            port: crate::defaults::DEFAULT_PORT,
            strategy,
            proxy: None,
            headers: Vec::new(),
            timeout: crate::defaults::DEFAULT_TIMEOUT,
            concurrency: Self::policy_for(strategy, crate::defaults::DEFAULT_CONCURRENCY_LIMIT),
        }
    }

    /// Socket probes fan out freely; process-backed probes share a worker pool
    pub fn policy_for(strategy: StrategyKind, limit: usize) -> ConcurrencyPolicy {
        match strategy {
            StrategyKind::Socket => ConcurrencyPolicy::Unbounded,
            StrategyKind::Tool | StrategyKind::Ping => ConcurrencyPolicy::Bounded(limit),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: ConcurrencyPolicy) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Timeout in whole seconds, as passed to external tools
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs().max(1)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::new(StrategyKind::default())
    }
}

/// Free-form labels attached to a run and carried into its report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLabels {
    pub user: Option<String>,
    pub company: Option<String>,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hosts to probe
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,

    /// Probing strategy for the run
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Destination port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional proxy URL for the tool strategy
    #[serde(default)]
    pub proxy: Option<String>,

    /// Extra headers for the tool strategy
    #[serde(default)]
    pub headers: Vec<(String, String)>,

    /// Connect timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Worker count for the tool and ping strategies
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,

    /// Name of the person running the test
    #[serde(default)]
    pub user: Option<String>,

    /// Company of the person running the test
    #[serde(default)]
    pub company: Option<String>,

    /// Report format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// File to write the JSON report to
    #[serde(default)]
    pub output_path: Option<PathBuf>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            strategy: StrategyKind::default(),
            port: default_port(),
            proxy: None,
            headers: Vec::new(),
            timeout_seconds: default_timeout_secs(),
            concurrency_limit: default_concurrency_limit(),
            user: None,
            company: None,
            output_format: OutputFormat::default(),
            output_path: None,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Trim host entries, drop blanks and collapse duplicates (first one wins)
    pub fn normalize_hosts(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.hosts = self
            .hosts
            .iter()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .filter(|h| seen.insert(h.to_ascii_lowercase()))
            .collect();
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            return Err(AppError::config("At least one host is required"));
        }

        for host in &self.hosts {
            validate_host(host)?;
        }

        if self.port == 0 {
            return Err(AppError::config("Port must be between 1 and 65535"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 300 {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        if self.concurrency_limit == 0 {
            return Err(AppError::config("Concurrency limit must be greater than 0"));
        }

        if self.concurrency_limit > 256 {
            return Err(AppError::config("Concurrency limit cannot exceed 256"));
        }

        if let Some(proxy) = &self.proxy {
            if let Err(e) = url::Url::parse(proxy) {
                return Err(AppError::config(format!("Invalid proxy URL '{}': {}", proxy, e)));
            }
        }

        Ok(())
    }

    /// Derive the immutable per-run probe settings
    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig::new(self.strategy)
            .with_port(self.port)
            .with_proxy(self.proxy.clone())
            .with_headers(self.headers.clone())
            .with_timeout(self.timeout())
            .with_concurrency(ProbeConfig::policy_for(self.strategy, self.concurrency_limit))
    }

    /// Labels carried into the run report
    pub fn labels(&self) -> RunLabels {
        RunLabels {
            user: self.user.clone(),
            company: self.company.clone(),
        }
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(hosts) = std::env::var("PROBE_HOSTS") {
            self.hosts = hosts
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(strategy) = std::env::var("PROBE_STRATEGY") {
            self.strategy = strategy.parse()
                .map_err(|e: AppError| AppError::config(format!("Invalid PROBE_STRATEGY value: {}", e.detail())))?;
        }

        if let Ok(port) = std::env::var("PROBE_PORT") {
            self.port = port.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PROBE_PORT value '{}': {}", port, e)))?;
        }

        if let Ok(proxy) = std::env::var("PROBE_PROXY") {
            let proxy = proxy.trim().to_string();
            self.proxy = if proxy.is_empty() { None } else { Some(proxy) };
        }

        if let Ok(headers) = std::env::var("PROBE_HEADERS") {
            self.headers = crate::config::headers::parse_header_lines(&headers);
        }

        if let Ok(timeout) = std::env::var("PROBE_TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PROBE_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Ok(limit) = std::env::var("PROBE_CONCURRENCY") {
            self.concurrency_limit = limit.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PROBE_CONCURRENCY value '{}': {}", limit, e)))?;
        }

        if let Ok(user) = std::env::var("PROBE_USER") {
            self.user = Some(user.trim().to_string()).filter(|u| !u.is_empty());
        }

        if let Ok(company) = std::env::var("PROBE_COMPANY") {
            self.company = Some(company.trim().to_string()).filter(|c| !c.is_empty());
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

/// Reject entries that are not bare host names or addresses
pub fn validate_host(host: &str) -> Result<()> {
    if host.is_empty() {
        return Err(AppError::config("Host cannot be empty"));
    }

    if host.contains("://") {
        return Err(AppError::config(format!(
            "Host '{}' must be a bare name without a scheme (e.g. graph.microsoft.com)",
            host
        )));
    }

    if host.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(AppError::config(format!("Invalid host '{}'", host)));
    }

    if host.len() > 253 {
        return Err(AppError::config(format!("Host '{}' exceeds 253 characters", host)));
    }

    Ok(())
}

// Default value functions for serde
fn default_hosts() -> Vec<String> {
    crate::defaults::DEFAULT_HOSTS
        .iter()
        .map(|&s| s.to_string())
        .collect()
}

fn default_port() -> u16 {
    crate::defaults::DEFAULT_PORT
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_concurrency_limit() -> usize {
    crate::defaults::DEFAULT_CONCURRENCY_LIMIT
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hosts.len(), 11);
        assert_eq!(config.port, 443);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.concurrency_limit, 10);
    }

    #[test]
    fn test_empty_host_list_invalid() {
        let mut config = Config::default();
        config.hosts.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_host_with_scheme_invalid() {
        let mut config = Config::default();
        config.hosts = vec!["https://graph.microsoft.com".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_host_with_path_invalid() {
        assert!(validate_host("aka.ms/avd").is_err());
        assert!(validate_host("aka ms").is_err());
        assert!(validate_host("aka.ms").is_ok());
        assert!(validate_host("127.0.0.1").is_ok());
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let mut config = Config::default();
        config.proxy = Some("not a proxy".to_string());
        assert!(config.validate().is_err());

        config.proxy = Some("http://proxy.corp:3128".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_and_concurrency_bounds() {
        let mut config = Config::default();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());
        config.timeout_seconds = 301;
        assert!(config.validate().is_err());
        config.timeout_seconds = 5;
        config.concurrency_limit = 0;
        assert!(config.validate().is_err());
        config.port = 0;
        config.concurrency_limit = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_normalize_hosts_dedups_and_trims() {
        let mut config = Config::default();
        config.hosts = vec![
            " aka.ms ".to_string(),
            "".to_string(),
            "graph.microsoft.com".to_string(),
            "AKA.ms".to_string(),
        ];
        config.normalize_hosts();
        assert_eq!(config.hosts, vec!["aka.ms".to_string(), "graph.microsoft.com".to_string()]);
    }

    #[test]
    fn test_probe_config_policy_per_strategy() {
        let mut config = Config::default();
        assert_eq!(config.probe_config().concurrency, ConcurrencyPolicy::Unbounded);

        config.strategy = StrategyKind::Tool;
        config.concurrency_limit = 4;
        assert_eq!(config.probe_config().concurrency, ConcurrencyPolicy::Bounded(4));

        config.strategy = StrategyKind::Ping;
        assert_eq!(config.probe_config().concurrency, ConcurrencyPolicy::Bounded(4));
    }

    #[test]
    fn test_probe_config_carries_request_options() {
        let mut config = Config::default();
        config.strategy = StrategyKind::Tool;
        config.proxy = Some("http://proxy:8080".to_string());
        config.headers = vec![("Authorization".to_string(), "Bearer x".to_string())];
        config.port = 8443;

        let probe = config.probe_config();
        assert_eq!(probe.port, 8443);
        assert_eq!(probe.proxy.as_deref(), Some("http://proxy:8080"));
        assert_eq!(probe.headers.len(), 1);
        assert_eq!(probe.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_proxy_is_dropped() {
        let probe = ProbeConfig::new(StrategyKind::Tool).with_proxy(Some("  ".to_string()));
        assert!(probe.proxy.is_none());
    }
}
