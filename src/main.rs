//! Connectivity Tester - Main CLI Application
//!
//! Probes a set of endpoints for reachability and latency and prints a
//! per-host and per-zone report.

use clap::Parser;
use connectivity_tester::{
    cli::Cli,
    config::{load_config, ConfigValidator, ValidationLevel},
    defaults::DEFAULT_HOSTS,
    error::{install_panic_hook, AppError, ErrorReporter, Result},
    executor::{ProbeScheduler, RunRequest, RunSession},
    logging::LoggerFactory,
    output::{Column, OutputCoordinator, PlainFormatter, FormattingOptions, TableFormat},
    stats::zone_of,
    types::OutputFormat,
    BUILD_TIME, GIT_COMMIT, PKG_NAME, TARGET_TRIPLE, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    install_panic_hook();

    // Parse command line arguments
    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    if let Err(e) = run_application(cli).await {
        reporter.report_error(&e);

        // Print suggestions for common errors
        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::validation)?;

    if cli.should_show_topic_help() {
        print!("{}", cli.display_help());
        return Ok(());
    }

    if cli.list_defaults {
        print!("{}", format_default_hosts());
        return Ok(());
    }

    if cli.debug {
        eprintln!(
            "{} v{} ({}, built {}, commit {})",
            PKG_NAME,
            VERSION,
            TARGET_TRIPLE,
            BUILD_TIME,
            GIT_COMMIT.unwrap_or("unknown")
        );
        eprintln!("Debug mode enabled");
    }

    // Load and validate configuration
    let config = load_config(cli)?;

    for warning in ConfigValidator::validate_comprehensive(&config)? {
        if warning.level != ValidationLevel::Info || config.verbose || config.debug {
            eprintln!("{}", warning.format(config.enable_color));
        }
    }

    let logger_factory = LoggerFactory::new(config.clone());
    let error_logger = logger_factory.create_error_logger().await;
    let probe_logger = logger_factory.create_probe_logger().await;

    let request = RunRequest::from(&config);
    if config.verbose || config.debug {
        eprintln!(
            "Probing {} host(s) on port {} with the {} strategy ({})",
            request.hosts.len(),
            request.probe_config.port,
            config.strategy.name(),
            request.probe_config.concurrency
        );
    }

    let scheduler = ProbeScheduler::for_strategy(config.strategy).with_logger(probe_logger);
    let run = scheduler.execute(RunSession::new(request)).await;

    let coordinator = OutputCoordinator::from_config(&config);
    println!("{}", coordinator.render(&run)?);

    if let Some(path) = &config.output_path {
        if let Err(e) = coordinator.export(&run, path).await {
            error_logger.error_entry(&e, Some("report export")).log().await;
            return Err(e);
        }
        if config.output_format == OutputFormat::Table {
            let message = format!("Report written to {}", path.display());
            println!("\n{}", coordinator.formatter().format_success(&message)?);
        }
    }

    // A completed run exits 0 even when every host failed
    Ok(())
}

/// Default endpoint list with the zone each host is grouped under
fn format_default_hosts() -> String {
    let formatter = PlainFormatter::new(FormattingOptions {
        enable_color: false,
        ..FormattingOptions::default()
    });
    let format = TableFormat::new(vec![Column::left("Host"), Column::left("Zone")], true);
    let rows: Vec<Vec<String>> = DEFAULT_HOSTS
        .iter()
        .map(|host| vec![host.to_string(), zone_of(host)])
        .collect();

    formatter.create_table(&format, &rows)
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format (see --help-topic env)");
            eprintln!("  - Hosts are bare names such as graph.microsoft.com, without a scheme");
            eprintln!("  - Proxy URLs need a scheme, e.g. http://proxy.corp:3128");
        }
        AppError::Tool(_) => {
            eprintln!();
            eprintln!("External tool help:");
            eprintln!("  - The tool strategy needs curl on PATH");
            eprintln!("  - The ping strategy needs the system ping binary");
            eprintln!("  - Use --strategy socket to probe without external tools");
        }
        AppError::Io(_) => {
            eprintln!();
            eprintln!("File access help:");
            eprintln!("  - Check that the --output directory exists and is writable");
            eprintln!("  - Check that the --headers-file path is readable");
        }
        _ => {}
    }
}
