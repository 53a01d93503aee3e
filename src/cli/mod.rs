//! Command-line interface module with topic help

pub mod help;

pub use help::HelpSystem;

use crate::types::{OutputFormat, StrategyKind};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Connectivity Tester - probe endpoints for reachability and latency
#[derive(Parser, Debug, Clone)]
#[command(name = "conntest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Host to probe (can be used multiple times; defaults to the AvD endpoint set)
    #[arg(long = "host", value_name = "HOST", action = ArgAction::Append)]
    pub hosts: Vec<String>,

    /// Probing strategy
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyKind>,

    /// Destination port
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Proxy URL (tool strategy only)
    #[arg(short = 'x', long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Extra request header "Key: Value" (tool strategy only, repeatable)
    #[arg(long = "header", value_name = "HEADER", action = ArgAction::Append)]
    pub headers: Vec<String>,

    /// File with one "Key: Value" header per line
    #[arg(long, value_name = "PATH")]
    pub headers_file: Option<PathBuf>,

    /// Connect timeout in seconds
    #[arg(short, long, value_parser = parse_duration)]
    pub timeout: Option<u64>,

    /// Maximum concurrent probes for the tool and ping strategies
    #[arg(short, long, value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// User label carried into the report
    #[arg(long)]
    pub user: Option<String>,

    /// Company label carried into the report
    #[arg(long)]
    pub company: Option<String>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also write the JSON report to this file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Print the default host list and exit
    #[arg(long)]
    pub list_defaults: bool,

    /// Show help for specific topic (strategies, env, examples, output)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        for host in &self.hosts {
            if let Err(e) = crate::models::config::validate_host(host.trim()) {
                return Err(e.detail().to_string());
            }
        }

        if let Some(proxy) = &self.proxy {
            if let Err(e) = url::Url::parse(proxy) {
                return Err(format!("Invalid proxy URL '{}': {}", proxy, e));
            }
        }

        Ok(())
    }

    /// Headers given with --header, parsed and with malformed entries dropped
    pub fn parsed_headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .filter_map(|h| crate::config::headers::parse_header_line(h))
            .collect()
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Display help for the requested topic
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        match &self.help_topic {
            Some(topic) => help_system
                .display_topic_help(topic, use_colors)
                .unwrap_or_else(|| {
                    format!(
                        "Unknown help topic: '{}'\n\nAvailable topics: {}\n",
                        topic,
                        HelpSystem::topics().join(", ")
                    )
                }),
            None => help_system.display_main_help(use_colors),
        }
    }
}

/// Parse a timeout in whole seconds
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > 300 {
                Err("Duration cannot exceed 300 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    s.parse::<usize>()
        .map_err(|_| format!("Invalid concurrency: {}", s))
        .and_then(|n| match n {
            0 => Err("Concurrency must be greater than 0".to_string()),
            n if n > 256 => Err("Concurrency cannot exceed 256".to_string()),
            n => Ok(n),
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    // Default to true on Unix-like systems, false on Windows
    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
