//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::{env::EnvManager, headers},
    error::Result,
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        self.load_env_file()?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config)?;

        // Every host must appear exactly once in a run
        config.normalize_hosts();
        config.validate()?;

        Ok(config)
    }

    fn load_env_file(&self) -> Result<()> {
        EnvManager::load_env_file(self.cli.debug)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        let cli = &self.cli;

        if !cli.hosts.is_empty() {
            config.hosts = cli.hosts.clone();
        }

        if let Some(strategy) = cli.strategy {
            config.strategy = strategy;
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        if let Some(proxy) = &cli.proxy {
            config.proxy = Some(proxy.trim().to_string()).filter(|p| !p.is_empty());
        }

        // A headers file replaces env headers; --header flags are appended
        if let Some(path) = &cli.headers_file {
            config.headers = headers::read_header_file(path)?;
        }
        config.headers.extend(cli.parsed_headers());

        if let Some(timeout) = cli.timeout {
            config.timeout_seconds = timeout;
        }

        if let Some(limit) = cli.concurrency {
            config.concurrency_limit = limit;
        }

        if let Some(user) = &cli.user {
            config.user = Some(user.clone());
        }

        if let Some(company) = &cli.company {
            config.company = Some(company.clone());
        }

        if let Some(format) = cli.format {
            config.output_format = format;
        }

        if let Some(path) = &cli.output {
            config.output_path = Some(path.clone());
        }

        if cli.color {
            config.enable_color = true;
        } else if cli.no_color {
            config.enable_color = false;
        }

        // CLI-only flags
        config.verbose = cli.verbose;
        config.debug = cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!("{}", display_config_summary(config));
        }

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Hosts: {}", config.hosts.join(", ")));
    summary.push(format!("Strategy: {}", config.strategy.name()));
    summary.push(format!("Port: {}", config.port));
    summary.push(format!("Proxy: {}", config.proxy.as_deref().unwrap_or("none")));
    summary.push(format!("Headers: {}", config.headers.len()));
    summary.push(format!("Timeout: {}s", config.timeout_seconds));
    summary.push(format!("Concurrency: {}", config.probe_config().concurrency));
    summary.push(format!("Output: {:?}", config.output_format));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
