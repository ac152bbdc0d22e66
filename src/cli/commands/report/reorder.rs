//! Reorder report: parts below their reorder point

use miette::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::helpers::{format_money, CommandContext};
use crate::cli::OutputFormat;
use crate::core::store::{ReconcileFilter, ReconciliationRow};
use crate::procurement::{suggested_reorder_quantity, StockStatus};

use super::{heading, markdown_table, render, write_output};

#[derive(clap::Args, Debug)]
pub struct ReorderArgs {
    /// Part-number pattern (`*` wildcard, substring without one)
    #[arg(long, short = 'p')]
    pub pattern: Option<String>,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// A part to reorder with its suggested quantity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReorderLine {
    pub part_number: String,
    pub part_description: Option<String>,
    pub current_stock: i64,
    pub reorder_point: i64,
    pub total_maintenance_need: i64,
    pub suggested_quantity: i64,
    pub unit_cost: f64,
    pub estimated_cost: f64,
    pub supplier: Option<String>,
}

impl From<&ReconciliationRow> for ReorderLine {
    fn from(row: &ReconciliationRow) -> Self {
        let suggested_quantity = suggested_reorder_quantity(
            row.current_stock,
            row.reorder_point,
            row.total_maintenance_need,
        );
        Self {
            part_number: row.part_number.clone(),
            part_description: row.part_description.clone(),
            current_stock: row.current_stock,
            reorder_point: row.reorder_point,
            total_maintenance_need: row.total_maintenance_need,
            suggested_quantity,
            unit_cost: row.unit_cost,
            estimated_cost: suggested_quantity as f64 * row.unit_cost,
            supplier: row.supplier.clone(),
        }
    }
}

pub fn run(args: ReorderArgs, ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let store = ctx.open_store()?;
    let filter = ReconcileFilter {
        status: Some(StockStatus::Reorder),
        pattern: args.pattern,
    };
    let lines: Vec<ReorderLine> = store
        .reconcile(&filter)?
        .iter()
        .map(ReorderLine::from)
        .collect();

    let content = render(&lines, format, || render_markdown(&lines))?;
    write_output(&content, args.output)
}

pub(crate) fn render_markdown(lines: &[ReorderLine]) -> String {
    let mut output = heading("Reorder List");

    if lines.is_empty() {
        output.push_str("No parts below their reorder point.\n");
        return output;
    }

    output.push_str(&markdown_table(
        &[
            "Part", "Description", "Current", "Reorder", "Need", "Order", "Unit Cost", "Est. Cost",
            "Supplier",
        ],
        lines.iter().map(|l| {
            vec![
                l.part_number.clone(),
                l.part_description.clone().unwrap_or_default(),
                l.current_stock.to_string(),
                l.reorder_point.to_string(),
                l.total_maintenance_need.to_string(),
                l.suggested_quantity.to_string(),
                format_money(l.unit_cost),
                format_money(l.estimated_cost),
                l.supplier.clone().unwrap_or_else(|| "-".to_string()),
            ]
        }),
    ));

    let total: f64 = lines.iter().map(|l| l.estimated_cost).sum();
    output.push_str(&format!(
        "\n**{} part(s) to reorder, estimated cost {}**\n",
        lines.len(),
        format_money(total)
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reorder_row(current: i64, reorder: i64, need: i64) -> ReconciliationRow {
        ReconciliationRow {
            part_number: "FILTER-004-02".to_string(),
            part_description: None,
            current_stock: current,
            minimum_stock: 1,
            reorder_point: reorder,
            unit_cost: 12.5,
            supplier: None,
            total_maintenance_need: need,
            stock_after_maintenance: current - need,
            stock_status: StockStatus::Reorder,
        }
    }

    #[test]
    fn test_suggested_quantity_tops_up_past_reorder_point() {
        let line = ReorderLine::from(&reorder_row(3, 8, 4));
        assert_eq!(line.suggested_quantity, 7);
        assert_eq!(line.estimated_cost, 87.5);
    }

    #[test]
    fn test_suggested_quantity_covers_large_demand() {
        let line = ReorderLine::from(&reorder_row(3, 8, 20));
        assert_eq!(line.suggested_quantity, 17);
    }

    #[test]
    fn test_render_markdown_total() {
        let lines = vec![ReorderLine::from(&reorder_row(3, 8, 4))];
        let md = render_markdown(&lines);
        assert!(md.contains("FILTER-004-02"));
        assert!(md.contains("estimated cost $87.50"));
    }
}
