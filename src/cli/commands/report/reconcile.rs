//! Reconciliation report: stock against total maintenance demand

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{format_money, CommandContext};
use crate::cli::OutputFormat;
use crate::core::store::{ReconcileFilter, ReconciliationRow};
use crate::procurement::StockStatus;

use super::{heading, markdown_table, render, write_output};

#[derive(clap::Args, Debug)]
pub struct ReconcileArgs {
    /// Only rows with this status (reorder, low, insufficient, sufficient)
    #[arg(long, short = 's')]
    pub status: Option<StockStatus>,

    /// Part-number pattern (`*` wildcard, substring without one)
    #[arg(long, short = 'p')]
    pub pattern: Option<String>,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ReconcileArgs, ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let store = ctx.open_store()?;
    let filter = ReconcileFilter {
        status: args.status,
        pattern: args.pattern,
    };
    let rows = store.reconcile(&filter)?;

    let content = render(&rows, format, || render_markdown(&rows))?;
    write_output(&content, args.output)
}

pub(crate) fn render_markdown(rows: &[ReconciliationRow]) -> String {
    let mut output = heading("Stock vs Maintenance Reconciliation");

    if rows.is_empty() {
        output.push_str("No stocked parts match.\n");
        return output;
    }

    output.push_str("## Summary\n\n");
    output.push_str(&markdown_table(
        &["Status", "Parts"],
        StockStatus::ALL.iter().map(|status| {
            let count = rows.iter().filter(|r| r.stock_status == *status).count();
            vec![status.to_string(), count.to_string()]
        }),
    ));
    let value: f64 = rows
        .iter()
        .map(|r| r.current_stock as f64 * r.unit_cost)
        .sum();
    output.push_str(&format!("\nInventory value: {}\n\n", format_money(value)));

    output.push_str("## Parts\n\n");
    output.push_str(&markdown_table(
        &[
            "Part", "Description", "Current", "Min", "Reorder", "Need", "After", "Status",
        ],
        rows.iter().map(|r| {
            vec![
                r.part_number.clone(),
                r.part_description.clone().unwrap_or_default(),
                r.current_stock.to_string(),
                r.minimum_stock.to_string(),
                r.reorder_point.to_string(),
                r.total_maintenance_need.to_string(),
                r.stock_after_maintenance.to_string(),
                r.stock_status.to_string(),
            ]
        }),
    ));

    output
}
