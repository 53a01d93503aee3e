//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    error::{AppError, Result},
    executor::CompletedRun,
    models::{ProbeResult, ZoneStat},
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the headline numbers of a finished run
    fn format_run_summary(&self, run: &CompletedRun) -> Result<String>;

    /// Format one row per probed host
    fn format_results_table(&self, results: &[ProbeResult], port: u16) -> Result<String>;

    /// Format min/max/mean per zone
    fn format_zone_table(&self, zones: &[ZoneStat]) -> Result<String>;

    /// Format a bar chart of mean latency per zone with its min-max range
    fn format_latency_chart(&self, zones: &[ZoneStat]) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Widest the detail column may grow before it is cut
    pub max_detail_width: usize,
    /// Width of the longest bar in the latency chart
    pub chart_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_detail_width: 60,
            chart_width: 40,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Show borders around table
    pub show_borders: bool,
    /// Show header row
    pub show_header: bool,
}

impl TableFormat {
    pub fn new(columns: Vec<Column>, show_borders: bool) -> Self {
        Self {
            columns,
            show_borders,
            show_header: true,
        }
    }
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header
    pub header: String,
    /// Column alignment
    pub alignment: Alignment,
    /// Maximum width
    pub max_width: usize,
}

impl Column {
    pub fn left(header: &str) -> Self {
        Self {
            header: header.to_string(),
            alignment: Alignment::Left,
            max_width: usize::MAX,
        }
    }

    pub fn right(header: &str) -> Self {
        Self {
            alignment: Alignment::Right,
            ..Self::left(header)
        }
    }

    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Placeholder for a missing latency
pub const NO_VALUE: &str = "-";

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Create a table with the given format and data
    pub fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        self.create_table_with(format, rows, |_, _, cell| cell.to_string())
    }

    /// Create a table, passing every padded data cell through `style`
    /// together with its row and column index. Padding happens before
    /// styling so escape codes never disturb the column widths.
    pub fn create_table_with<F>(&self, format: &TableFormat, rows: &[RowData], style: F) -> String
    where
        F: Fn(usize, usize, &str) -> String,
    {
        if rows.is_empty() {
            return String::new();
        }

        let column_widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format, |_, cell| cell.to_string()));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for (row_idx, row) in rows.iter().enumerate() {
            output.push_str(&self.create_row(row, &column_widths, format, |col_idx, cell| {
                style(row_idx, col_idx, cell)
            }));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
            output.push('\n');
        }

        output
    }

    /// Calculate optimal column widths
    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format
            .columns
            .len()
            .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

        (0..num_columns)
            .map(|col_idx| {
                let column = format.columns.get(col_idx);
                let header_width = column.map(|c| display_width(&c.header)).unwrap_or(0);

                let content_width = rows
                    .iter()
                    .filter_map(|row| row.get(col_idx))
                    .map(|cell| display_width(cell))
                    .max()
                    .unwrap_or(0);

                let width = header_width.max(content_width);
                match column {
                    Some(c) => width.min(c.max_width.max(header_width)),
                    None => width,
                }
            })
            .collect()
    }

    /// Create a table row
    fn create_row<F>(&self, data: &[String], widths: &[usize], format: &TableFormat, style: F) -> String
    where
        F: Fn(usize, &str) -> String,
    {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, &width) in widths.iter().enumerate() {
            let cell = data.get(idx).map(String::as_str).unwrap_or("");
            let alignment = format
                .columns
                .get(idx)
                .map(|c| &c.alignment)
                .unwrap_or(&Alignment::Left);

            let padded_cell = align_text(cell, width, alignment);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&style(idx, &padded_cell));
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    /// Create horizontal border for table
    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }

    /// Layout of the results table
    pub fn results_table_format(&self) -> TableFormat {
        TableFormat::new(
            vec![
                Column::left("Host"),
                Column::left("Zone"),
                Column::right("Port"),
                Column::left("Status"),
                Column::right("Latency (ms)"),
                Column::left("Detail").with_max_width(self.options.max_detail_width),
            ],
            self.options.table_borders,
        )
    }

    /// Layout of the zone statistics table
    pub fn zone_table_format(&self) -> TableFormat {
        let mut columns = vec![
            Column::left("Zone"),
            Column::right("Min"),
            Column::right("Max"),
            Column::right("Avg"),
        ];
        if self.options.verbose_mode {
            columns.push(Column::right("Samples"));
        }
        TableFormat::new(columns, self.options.table_borders)
    }

    /// Cells for one result row; `status` lets callers pick the label form
    pub fn result_row(&self, result: &ProbeResult, port: u16, status: &str) -> RowData {
        vec![
            result.host.clone(),
            result.zone(),
            port.to_string(),
            status.to_string(),
            format_latency(result.latency_ms),
            result.detail.clone().unwrap_or_default(),
        ]
    }

    pub fn zone_row(&self, zone: &ZoneStat) -> RowData {
        let mut row = vec![
            zone.zone.clone(),
            format!("{:.2}", zone.min),
            format!("{:.2}", zone.max),
            format!("{:.2}", zone.mean),
        ];
        if self.options.verbose_mode {
            row.push(zone.samples.to_string());
        }
        row
    }

    /// Lines of the latency chart as (label, bar length, trailer) so both
    /// formatters lay the chart out identically
    pub fn chart_lines(&self, zones: &[ZoneStat]) -> Vec<ChartLine> {
        let peak = zones.iter().map(|z| z.mean).fold(0.0_f64, f64::max);
        let label_width = zones.iter().map(|z| display_width(&z.zone)).max().unwrap_or(0);

        zones
            .iter()
            .map(|zone| ChartLine {
                label: align_text(&zone.zone, label_width, &Alignment::Left),
                filled: bar_length(zone.mean, peak, self.options.chart_width),
                width: self.options.chart_width,
                mean: zone.mean,
                range: format!("{:.2} - {:.2}", zone.min, zone.max),
            })
            .collect()
    }
}

/// One zone's row in the latency chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub label: String,
    pub filled: usize,
    pub width: usize,
    pub mean: f64,
    pub range: String,
}

/// Length of a bar for `value` when `peak` fills `width` cells.
/// Any positive value gets at least one cell.
pub fn bar_length(value: f64, peak: f64, width: usize) -> usize {
    if !(peak > 0.0) || !(value > 0.0) {
        return 0;
    }
    let cells = (value / peak * width as f64).round() as usize;
    cells.clamp(1, width)
}

/// Latency cell text
pub fn format_latency(latency_ms: Option<f64>) -> String {
    latency_ms
        .map(|ms| format!("{:.2}", ms))
        .unwrap_or_else(|| NO_VALUE.to_string())
}

/// Width of `text` in terminal cells, counted in chars
pub fn display_width(text: &str) -> usize {
    text.chars().count()
}

/// Align text within specified width, cutting it with "..." when too long
pub fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
    let len = display_width(text);
    if len > width {
        if width <= 3 {
            return text.chars().take(width).collect();
        }
        let cut: String = text.chars().take(width - 3).collect();
        return format!("{}...", cut);
    }

    let padding = " ".repeat(width - len);
    match alignment {
        Alignment::Left => format!("{}{}", text, padding),
        Alignment::Right => format!("{}{}", padding, text),
    }
}

/// Format duration in human-readable format
pub fn format_duration(duration_ms: f64) -> String {
    if duration_ms < 1000.0 {
        format!("{:.0}ms", duration_ms)
    } else if duration_ms < 60000.0 {
        format!("{:.2}s", duration_ms / 1000.0)
    } else {
        let minutes = (duration_ms / 60000.0) as u32;
        let seconds = (duration_ms % 60000.0) / 1000.0;
        format!("{}m{:.1}s", minutes, seconds)
    }
}

/// Format percentage with appropriate precision
pub fn format_percentage(percentage: f64) -> String {
    if percentage >= 99.95 {
        "100.0%".to_string()
    } else if percentage < 0.05 {
        "0.0%".to_string()
    } else {
        format!("{:.1}%", percentage)
    }
}

pub(crate) fn fmt_error(section: &str) -> impl Fn(std::fmt::Error) -> AppError + '_ {
    move |e| AppError::output(format!("Failed to format {}: {}", section, e))
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(display_width(title) + 4);

        writeln!(output, "{}", border).map_err(fmt_error("header"))?;
        writeln!(output, "  {}  ", title).map_err(fmt_error("header"))?;
        write!(output, "{}", border).map_err(fmt_error("header"))?;

        Ok(output)
    }

    fn format_run_summary(&self, run: &CompletedRun) -> Result<String> {
        let mut output = String::new();
        let summary = &run.summary;
        let err = fmt_error("summary");

        writeln!(output, "Run Summary:").map_err(&err)?;
        writeln!(output, "------------").map_err(&err)?;
        if self.options.verbose_mode {
            writeln!(output, "Session:       {}", run.session_id).map_err(&err)?;
            writeln!(output, "Started:       {}", run.started_at.to_rfc3339()).map_err(&err)?;
        }
        writeln!(output, "Strategy:      {} (port {})", run.strategy.name(), run.port).map_err(&err)?;
        if let Some(user) = &run.labels.user {
            writeln!(output, "User:          {}", user).map_err(&err)?;
        }
        if let Some(company) = &run.labels.company {
            writeln!(output, "Company:       {}", company).map_err(&err)?;
        }
        writeln!(output, "Hosts:         {}", summary.total_hosts).map_err(&err)?;
        writeln!(
            output,
            "Reachable:     {} ({})",
            summary.reachable,
            format_percentage(summary.success_rate)
        )
        .map_err(&err)?;
        writeln!(output, "Failed:        {}", summary.failed).map_err(&err)?;
        if summary.unmeasured > 0 {
            writeln!(output, "No latency:    {}", summary.unmeasured).map_err(&err)?;
        }
        if let (Some(fastest), Some(slowest)) = (&summary.fastest_zone, &summary.slowest_zone) {
            writeln!(output, "Fastest zone:  {}", fastest).map_err(&err)?;
            writeln!(output, "Slowest zone:  {}", slowest).map_err(&err)?;
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
        writeln!(output, "Results:").map_err(fmt_error("results"))?;

        if results.is_empty() {
            write!(output, "No hosts were probed.").map_err(fmt_error("results"))?;
            return Ok(output);
        }

        let rows: Vec<RowData> = results
            .iter()
            .map(|r| self.result_row(r, port, r.status.as_str()))
            .collect();
        output.push_str(&self.create_table(&self.results_table_format(), &rows));

        Ok(output.trim_end().to_string())
    }

    fn format_zone_table(&self, zones: &[ZoneStat]) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "Latency by Zone (ms):").map_err(fmt_error("zone table"))?;

        if zones.is_empty() {
            write!(output, "No zone returned a measured latency.").map_err(fmt_error("zone table"))?;
            return Ok(output);
        }

        let rows: Vec<RowData> = zones.iter().map(|z| self.zone_row(z)).collect();
        output.push_str(&self.create_table(&self.zone_table_format(), &rows));

        Ok(output.trim_end().to_string())
    }

    fn format_latency_chart(&self, zones: &[ZoneStat]) -> Result<String> {
        let mut output = String::new();
        let err = fmt_error("chart");
        writeln!(output, "Mean Latency by Zone:").map_err(&err)?;

        if zones.is_empty() {
            write!(output, "Nothing to chart.").map_err(&err)?;
            return Ok(output);
        }

        for line in self.chart_lines(zones) {
            writeln!(
                output,
                "{} |{}{}| {:>9.2} ms  [{}]",
                line.label,
                "#".repeat(line.filled),
                " ".repeat(line.width - line.filled),
                line.mean,
                line.range
            )
            .map_err(&err)?;
        }

        Ok(output.trim_end().to_string())
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
