//! Output formatting and display system
//!
//! Renders a completed run as a terminal report (plain or colored) or as a
//! JSON document, and exports the JSON report to a file.

mod colored;
mod formatter;
mod json;

pub use self::colored::{ColorScheme, ColoredFormatter, PerformanceLevel};
pub use formatter::{
    bar_length, Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat,
};
pub use json::RunReport;

use crate::{error::Result, executor::CompletedRun, models::Config, types::OutputFormat};
use std::path::Path;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }
}

/// Main output coordinator that handles all result display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    format: OutputFormat,
}

impl OutputCoordinator {
    /// Create a new output coordinator with the specified formatter
    pub fn new(formatter: Box<dyn OutputFormatter>, format: OutputFormat) -> Self {
        Self { formatter, format }
    }

    /// Coordinator matching the color, verbosity and format settings of `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            OutputFormatterFactory::create_formatter(config.enable_color, config.verbose),
            config.output_format,
        )
    }

    pub fn formatter(&self) -> &dyn OutputFormatter {
        self.formatter.as_ref()
    }

    /// Render the run in the configured format
    pub fn render(&self, run: &CompletedRun) -> Result<String> {
        match self.format {
            OutputFormat::Table => self.display_results(run),
            OutputFormat::Json => RunReport::from_run(run).to_json(),
        }
    }

    /// Full terminal report: header, summary, per-host results, zone
    /// statistics and the mean latency chart
    pub fn display_results(&self, run: &CompletedRun) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.formatter.format_header("Connectivity Test Results")?);
        output.push_str("\n\n");

        output.push_str(&self.formatter.format_run_summary(run)?);
        output.push_str("\n\n");

        output.push_str(&self.formatter.format_results_table(&run.results, run.port)?);
        output.push_str("\n\n");

        output.push_str(&self.formatter.format_zone_table(&run.zone_stats)?);
        output.push_str("\n\n");

        output.push_str(&self.formatter.format_latency_chart(&run.zone_stats)?);

        if run.all_failed() {
            output.push_str("\n\n");
            output.push_str(&self.formatter.format_warning("No host was reachable")?);
        }

        Ok(output)
    }

    /// Write the JSON report for `run` to `path`
    pub async fn export(&self, run: &CompletedRun, path: &Path) -> Result<()> {
        RunReport::from_run(run).write_to(path).await
    }
}
