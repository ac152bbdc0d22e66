//! `maintkit report` command - Generate procurement reports
//!
//! Reports render as markdown. With `--format json` or `--format yaml` the
//! underlying rows are emitted instead.

mod alerts;
mod cost;
mod reconcile;
mod reorder;

use clap::Subcommand;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_money, CommandContext};
use crate::cli::output::render_structured;
use crate::cli::{GlobalOpts, OutputFormat};

pub use alerts::AlertsArgs;
pub use cost::CostArgs;
pub use reconcile::ReconcileArgs;
pub use reorder::ReorderArgs;

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Stock levels against total maintenance demand
    Reconcile(ReconcileArgs),

    /// Parts below their reorder point with suggested quantities
    Reorder(ReorderArgs),

    /// Maintenance demand priced against stock
    Cost(CostArgs),

    /// Every part needing attention, most severe first
    Alerts(AlertsArgs),
}

pub fn run(cmd: ReportCommands, global: &GlobalOpts) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;
    let format = ctx.format(global, OutputFormat::Md);

    match cmd {
        ReportCommands::Reconcile(args) => reconcile::run(args, &ctx, format),
        ReportCommands::Reorder(args) => reorder::run(args, &ctx, format),
        ReportCommands::Cost(args) => cost::run(args, &ctx, format),
        ReportCommands::Alerts(args) => alerts::run(args, &ctx, format),
    }
}

// Shared helper functions

pub(crate) fn write_output(content: &str, output_path: Option<PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            println!("Report written to: {}", path.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

/// Structured rows for json/yaml, otherwise the markdown document
pub(crate) fn render<T, F>(rows: &T, format: OutputFormat, markdown: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    Ok(render_structured(rows, format)?.unwrap_or_else(markdown))
}

/// Report title with generation timestamp
pub(crate) fn heading(title: &str) -> String {
    format!(
        "# {}\n\nGenerated: {}\n\n",
        title,
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    )
}

/// Markdown table from a header and string rows
pub(crate) fn markdown_table<I>(header: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut builder = Builder::default();
    builder.push_record(header.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build().with(Style::markdown()).to_string();
    table.push('\n');
    table
}

pub(crate) fn optional_money(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_money)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_table_shape() {
        let table = markdown_table(
            &["Part", "Qty"],
            vec![vec!["BEAR-001-01".to_string(), "2".to_string()]],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("| Part"));
        assert!(lines[1].starts_with("|-"));
        assert!(lines[2].contains("BEAR-001-01"));
    }

    #[test]
    fn test_render_prefers_structured() {
        let rows = vec![1, 2, 3];
        let json = render(&rows, OutputFormat::Json, || "markdown".to_string()).unwrap();
        assert!(json.contains('['));
        let md = render(&rows, OutputFormat::Md, || "markdown".to_string()).unwrap();
        assert_eq!(md, "markdown");
    }

    #[test]
    fn test_optional_money() {
        assert_eq!(optional_money(Some(12.5)), format_money(12.5));
        assert_eq!(optional_money(Some(12.5)), "$12.50");
        assert_eq!(optional_money(None), "-");
    }

    #[test]
    fn test_write_output_to_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.md");
        write_output("# Report\n", Some(path.clone())).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Report\n");
    }
}
