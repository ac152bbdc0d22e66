//! Table formatting utilities for CLI list commands
//!
//! Commands describe their columns once and build typed rows; the formatter
//! renders them as aligned TSV, CSV or a markdown table.

use console::style;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::procurement::{Availability, StockStatus};

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Equipment id (cyan)
    Id(u32),
    /// Part number (cyan)
    Part(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Integer, right aligned
    Number(i64),
    /// Currency amount, `-` when unknown
    Money(Option<f64>),
    /// Reconciliation status with color coding
    Status(StockStatus),
    /// Request availability with color coding
    Availability(Availability),
    /// Placeholder
    Empty,
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Part(p) => format!("{:<width$}", style(p).cyan(), width = width),
            CellValue::Text(s) => {
                format!("{:<width$}", truncate_str(s, width), width = width)
            }
            CellValue::Number(n) => format!("{:>width$}", n, width = width),
            CellValue::Money(Some(v)) => format!("{:>width$.2}", v, width = width),
            CellValue::Money(None) => {
                format!("{:>width$}", style("-").dim(), width = width)
            }
            CellValue::Status(status) => {
                let s = status.as_str();
                let styled = match status {
                    StockStatus::Reorder => style(s).red().bold(),
                    StockStatus::LowStock => style(s).yellow(),
                    StockStatus::InsufficientForMaintenance => style(s).magenta(),
                    StockStatus::Sufficient => style(s).green(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Availability(a) => {
                let s = a.as_str();
                let styled = match a {
                    Availability::InStock => style(s).green(),
                    Availability::LowStock => style(s).yellow(),
                    Availability::OutOfStock => style(s).red().bold(),
                    Availability::NotFound => style(s).dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Empty => format!("{:<width$}", "-", width = width),
        }
    }

    /// Raw value, no colors or padding
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(id) => id.to_string(),
            CellValue::Part(s) | CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Money(v) => v.map(|v| format!("{:.2}", v)).unwrap_or_default(),
            CellValue::Status(s) => s.as_str().to_string(),
            CellValue::Availability(a) => a.as_str().to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        escape_csv(&self.raw())
    }

    /// Format for Markdown output (escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Money(None) | CellValue::Empty => "-".to_string(),
            CellValue::Money(Some(v)) => format!("${:.2}", v),
            CellValue::Status(s) if s.needs_attention() => format!("**{}**", s),
            other => other.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Display width of the raw content
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Empty | CellValue::Money(None) => 1,
            other => other.raw().chars().count(),
        }
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    noun: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], noun: &'static str) -> Self {
        Self {
            columns,
            noun,
            show_summary: true,
        }
    }

    /// Suppress the trailing "N item(s) found" line
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Output rows in the specified format
    pub fn output<I>(&self, rows: I, format: OutputFormat)
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();
        match format {
            OutputFormat::Csv => print!("{}", self.render_csv(&rows)),
            OutputFormat::Md => println!("{}", self.render_md(&rows)),
            _ => self.output_tsv(&rows),
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(CellValue::display_width)
                    .max()
                    .unwrap_or(0);
                col.header.len().max(max_content).min(col.width)
            })
            .collect()
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        println!("{}", header.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        println!("{}", "-".repeat(total_width));

        for row in rows {
            let line: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => CellValue::Empty.format_tsv(*w),
                })
                .collect();
            println!("{}", line.join(" ").trim_end());
        }

        if self.show_summary {
            println!();
            println!("{} {}(s) found.", style(rows.len()).cyan(), self.noun);
        }
    }

    /// CSV with a header row of column keys
    pub fn render_csv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let keys: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        out.push_str(&keys.join(","));
        out.push('\n');
        for row in rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(CellValue::format_csv).unwrap_or_default())
                .collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }

    /// Markdown table
    pub fn render_md(&self, rows: &[TableRow]) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| c.header.to_string()));
        for row in rows {
            builder.push_record(self.columns.iter().map(|col| {
                row.get(col.key)
                    .map(CellValue::format_md)
                    .unwrap_or_else(|| "-".to_string())
            }));
        }
        builder.build().with(Style::markdown()).to_string()
    }
}
