//! Environment variable handling and .env file management

use crate::error::{ErrorContext, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env").context("Failed to load .env file")?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("PROBE_HOSTS", "Comma-separated list of hosts to probe", "aka.ms,graph.microsoft.com"),
            ("PROBE_STRATEGY", "Probing strategy (socket, tool, ping)", "socket"),
            ("PROBE_PORT", "Destination port (1-65535)", "443"),
            ("PROBE_PROXY", "Proxy URL for the tool strategy", "http://proxy.corp:3128"),
            ("PROBE_HEADERS", "Extra headers for the tool strategy, one per line", "X-Client: conntest"),
            ("PROBE_TIMEOUT_SECONDS", "Connect timeout in seconds (1-300)", "5"),
            ("PROBE_CONCURRENCY", "Worker count for tool and ping (1-256)", "10"),
            ("PROBE_USER", "User label carried into the report", "jdoe"),
            ("PROBE_COMPANY", "Company label carried into the report", "Contoso"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }
}
