//! Configuration validation utilities and rules

use crate::{
    error::Result,
    models::Config,
    types::StrategyKind,
};
use colored::Colorize;
use regex::Regex;
use std::net::IpAddr;

/// Configuration validator with advisory checks beyond `Config::validate`
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        // Hard failures first
        config.validate()?;

        warnings.extend(Self::validate_hosts(&config.hosts));
        warnings.extend(Self::validate_strategy_options(config));
        warnings.extend(Self::validate_performance_settings(config));

        Ok(warnings)
    }

    /// Check host names for unusual syntax and private targets
    fn validate_hosts(hosts: &[String]) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let label = Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").ok();

        for host in hosts {
            if let Ok(ip) = host.parse::<IpAddr>() {
                let local = match ip {
                    IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
                    IpAddr::V6(v6) => v6.is_loopback(),
                };
                if local {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Host '{}' is a private/local address", host),
                    ));
                }
                continue;
            }

            if let Some(label) = &label {
                let bad_label = host
                    .trim_end_matches('.')
                    .split('.')
                    .find(|part| !label.is_match(part));
                if let Some(part) = bad_label {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("Host '{}' has an unusual label '{}' and may not resolve", host, part),
                    ));
                }
            }

            if !host.contains('.') {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Host '{}' has a single label; it forms its own zone", host),
                ));
            }
        }

        warnings
    }

    /// Flag options the selected strategy does not use
    fn validate_strategy_options(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if !config.strategy.uses_request_options() {
            if config.proxy.is_some() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Proxy is ignored by the {} strategy", config.strategy.name()),
                ));
            }
            if !config.headers.is_empty() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "{} header(s) ignored by the {} strategy",
                        config.headers.len(),
                        config.strategy.name()
                    ),
                ));
            }
        }

        if config.strategy == StrategyKind::Ping && config.port != crate::defaults::DEFAULT_PORT {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Ping does not use a port; port {} is ignored", config.port),
            ));
        } else if config.port != crate::defaults::DEFAULT_PORT {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Probing non-standard port {}", config.port),
            ));
        }

        warnings
    }

    /// Validate performance-related settings
    fn validate_performance_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.timeout_seconds < 2 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Timeout of {}s may report slow but reachable hosts as failed", config.timeout_seconds),
            ));
        } else if config.timeout_seconds > 60 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Long timeout of {}s will slow down failure detection", config.timeout_seconds),
            ));
        }

        if config.strategy != StrategyKind::Socket && config.concurrency_limit > 50 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Concurrency of {} runs that many {} processes at once",
                    config.concurrency_limit,
                    config.strategy.name().to_lowercase()
                ),
            ));
        }

        if config.hosts.len() > 100 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Probing {} hosts in a single run", config.hosts.len()),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        let tag = if use_color {
            match self.level {
                ValidationLevel::Info => tag.blue().to_string(),
                ValidationLevel::Warning => tag.yellow().to_string(),
            }
        } else {
            tag
        };
        format!("{} {}", tag, self.message)
    }
}
