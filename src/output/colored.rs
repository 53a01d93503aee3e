//! Colored formatter implementation with terminal color support
//!
//! Layout is shared with [`PlainFormatter`]; this formatter only adds ANSI
//! colors to already padded cells, so columns line up in both modes.

use super::formatter::{
    fmt_error, format_duration, format_percentage, FormattingOptions, OutputFormatter,
    PlainFormatter, RowData,
};
use crate::{
    error::Result,
    executor::CompletedRun,
    models::{ProbeResult, ZoneStat},
    types::ProbeStatus,
};
use colored::*;
use std::fmt::Write as _;

/// Latency band used to color latencies and chart bars
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerformanceLevel {
    Fast,     // < 100ms
    Moderate, // 100-300ms
    Slow,     // >= 300ms
}

impl PerformanceLevel {
    /// Determine performance level from a latency in milliseconds
    pub fn from_latency(latency_ms: f64) -> Self {
        if latency_ms < 100.0 {
            Self::Fast
        } else if latency_ms < 300.0 {
            Self::Moderate
        } else {
            Self::Slow
        }
    }

    /// Get color for this performance level
    pub fn color(&self) -> Color {
        match self {
            Self::Fast => Color::Green,
            Self::Moderate => Color::Yellow,
            Self::Slow => Color::Red,
        }
    }

    /// Get descriptive text
    pub fn description(&self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::Moderate => "Moderate",
            Self::Slow => "Slow",
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

// Column positions in the results table
const STATUS_COLUMN: usize = 3;
const LATENCY_COLUMN: usize = 4;
const DETAIL_COLUMN: usize = 5;

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Bold and colored, or plain when colors are disabled
    fn emphasize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.bold().color(color)
        } else {
            text.normal()
        }
    }

    /// Apply dimmed formatting if colors are enabled
    fn dimmed(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.dimmed()
        } else {
            text.normal()
        }
    }

    /// Color a latency cell by its band; `text` may carry padding
    fn latency_colored(&self, text: &str, latency_ms: Option<f64>) -> ColoredString {
        match latency_ms {
            Some(ms) => self.colorize(text, PerformanceLevel::from_latency(ms).color()),
            None => self.dimmed(text),
        }
    }

    fn status_colored(&self, text: &str, status: ProbeStatus) -> ColoredString {
        match status {
            ProbeStatus::Reachable => self.colorize(text, self.color_scheme.success),
            ProbeStatus::Failed => self.colorize(text, self.color_scheme.error),
        }
    }

    /// Format percentage with color coding based on value
    fn format_percentage_colored(&self, percentage: f64) -> ColoredString {
        let formatted = format_percentage(percentage);
        let color = if percentage >= 95.0 {
            self.color_scheme.success
        } else if percentage >= 50.0 {
            self.color_scheme.warning
        } else {
            self.color_scheme.error
        };
        self.colorize(&formatted, color)
    }

    /// Create a colored section header
    fn create_section_header(&self, title: &str) -> String {
        self.emphasize(title, self.color_scheme.header).to_string()
    }

    /// Color border lines of a rendered table
    fn color_borders(&self, table: &str) -> String {
        table
            .lines()
            .map(|line| {
                if line.starts_with('+') {
                    self.colorize(line, self.color_scheme.border).to_string()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "═".repeat(title.chars().count() + 4);
        let err = fmt_error("header");

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(&err)?;
        writeln!(output, "  {}  ", self.emphasize(title, self.color_scheme.header)).map_err(&err)?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(&err)?;

        Ok(output)
    }

    fn format_run_summary(&self, run: &CompletedRun) -> Result<String> {
        let mut output = String::new();
        let summary = &run.summary;
        let err = fmt_error("summary");

        writeln!(output, "{}", self.create_section_header("Run Summary")).map_err(&err)?;
        if self.options.verbose_mode {
            writeln!(output, "Session:       {}", self.dimmed(&run.session_id.to_string())).map_err(&err)?;
            writeln!(output, "Started:       {}", self.dimmed(&run.started_at.to_rfc3339())).map_err(&err)?;
        }
        writeln!(
            output,
            "Strategy:      {} (port {})",
            self.colorize(run.strategy.name(), self.color_scheme.info),
            run.port
        )
        .map_err(&err)?;
        if let Some(user) = &run.labels.user {
            writeln!(output, "User:          {}", user).map_err(&err)?;
        }
        if let Some(company) = &run.labels.company {
            writeln!(output, "Company:       {}", company).map_err(&err)?;
        }
        writeln!(
            output,
            "Hosts:         {}",
            self.colorize(&summary.total_hosts.to_string(), self.color_scheme.info)
        )
        .map_err(&err)?;
        writeln!(
            output,
            "Reachable:     {} ({})",
            self.colorize(&summary.reachable.to_string(), self.color_scheme.success),
            self.format_percentage_colored(summary.success_rate)
        )
        .map_err(&err)?;

        let failed = summary.failed.to_string();
        let failed = if summary.failed > 0 {
            self.colorize(&failed, self.color_scheme.error)
        } else {
            self.dimmed(&failed)
        };
        writeln!(output, "Failed:        {}", failed).map_err(&err)?;

        if summary.unmeasured > 0 {
            writeln!(
                output,
                "No latency:    {}",
                self.colorize(&summary.unmeasured.to_string(), self.color_scheme.warning)
            )
            .map_err(&err)?;
        }
        if let (Some(fastest), Some(slowest)) = (&summary.fastest_zone, &summary.slowest_zone) {
            writeln!(output, "Fastest zone:  {}", self.colorize(fastest, self.color_scheme.success)).map_err(&err)?;
            writeln!(output, "Slowest zone:  {}", self.colorize(slowest, self.color_scheme.warning)).map_err(&err)?;
        }
        write!(
            output,
            "Duration:      {}",
            format_duration(run.duration().as_secs_f64() * 1000.0)
        )
        .map_err(&err)?;

        Ok(output)
    }

    fn format_results_table(&self, results: &[ProbeResult], port: u16) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "{}", self.create_section_header("Results")).map_err(fmt_error("results"))?;

        if results.is_empty() {
            write!(output, "{}", self.dimmed("No hosts were probed.")).map_err(fmt_error("results"))?;
            return Ok(output);
        }

        let plain = &self.plain_formatter;
        let rows: Vec<RowData> = results
            .iter()
            .map(|r| plain.result_row(r, port, r.status.as_str()))
            .collect();

        let table = plain.create_table_with(&plain.results_table_format(), &rows, |row, col, cell| {
            let result = &results[row];
            match col {
                STATUS_COLUMN => self.status_colored(cell, result.status).to_string(),
                LATENCY_COLUMN => self.latency_colored(cell, result.sample()).to_string(),
                DETAIL_COLUMN if !result.is_reachable() => {
                    self.colorize(cell, self.color_scheme.error).to_string()
                }
                _ => cell.to_string(),
            }
        });
        output.push_str(&self.color_borders(&table));

        Ok(output)
    }

    fn format_zone_table(&self, zones: &[ZoneStat]) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "{}", self.create_section_header("Latency by Zone (ms)"))
            .map_err(fmt_error("zone table"))?;

        if zones.is_empty() {
            write!(output, "{}", self.dimmed("No zone returned a measured latency."))
                .map_err(fmt_error("zone table"))?;
            return Ok(output);
        }

        let plain = &self.plain_formatter;
        let rows: Vec<RowData> = zones.iter().map(|z| plain.zone_row(z)).collect();

        let table = plain.create_table_with(&plain.zone_table_format(), &rows, |row, col, cell| {
            let zone = &zones[row];
            match col {
                1 => self.latency_colored(cell, Some(zone.min)).to_string(),
                2 => self.latency_colored(cell, Some(zone.max)).to_string(),
                3 => self.emphasize(cell, PerformanceLevel::from_latency(zone.mean).color()).to_string(),
                _ => cell.to_string(),
            }
        });
        output.push_str(&self.color_borders(&table));

        Ok(output)
    }

    fn format_latency_chart(&self, zones: &[ZoneStat]) -> Result<String> {
        let mut output = String::new();
        let err = fmt_error("chart");
        writeln!(output, "{}", self.create_section_header("Mean Latency by Zone")).map_err(&err)?;

        if zones.is_empty() {
            write!(output, "{}", self.dimmed("Nothing to chart.")).map_err(&err)?;
            return Ok(output);
        }

        let lines = self.plain_formatter.chart_lines(zones);
        for (index, line) in lines.iter().enumerate() {
            let level = PerformanceLevel::from_latency(line.mean);
            let bar = self.colorize(&"█".repeat(line.filled), level.color());
            let rest = self.colorize(&"░".repeat(line.width - line.filled), self.color_scheme.muted);
            let mean = self.latency_colored(&format!("{:>9.2} ms", line.mean), Some(line.mean));

            write!(
                output,
                "{} {}{} {}  {}",
                line.label,
                bar,
                rest,
                mean,
                self.dimmed(&format!("[{}]", line.range))
            )
            .map_err(&err)?;
            if index + 1 < lines.len() {
                writeln!(output).map_err(&err)?;
            }
        }

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("⚠️  {}", self.colorize(warning, self.color_scheme.warning)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("✅ {}", self.colorize(message, self.color_scheme.success)))
    }
}
