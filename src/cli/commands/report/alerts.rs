//! Alerts report: every part that is not sufficient, most severe first

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::CommandContext;
use crate::cli::OutputFormat;
use crate::core::store::{ReconcileFilter, ReconciliationRow};
use crate::procurement::StockStatus;

use super::{heading, markdown_table, render, write_output};

#[derive(clap::Args, Debug)]
pub struct AlertsArgs {
    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: AlertsArgs, ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let store = ctx.open_store()?;
    let alerts = collect_alerts(store.reconcile(&ReconcileFilter::default())?);

    let content = render(&alerts, format, || render_markdown(&alerts))?;
    write_output(&content, args.output)
}

/// Rows needing attention ordered by severity, then part number
pub(crate) fn collect_alerts(rows: Vec<ReconciliationRow>) -> Vec<ReconciliationRow> {
    let mut alerts: Vec<_> = rows
        .into_iter()
        .filter(|r| r.stock_status.needs_attention())
        .collect();
    alerts.sort_by(|a, b| {
        a.stock_status
            .cmp(&b.stock_status)
            .then_with(|| a.part_number.cmp(&b.part_number))
    });
    alerts
}

pub(crate) fn render_markdown(alerts: &[ReconciliationRow]) -> String {
    let mut output = heading("Stock Alerts");

    if alerts.is_empty() {
        output.push_str("All parts are sufficient for planned maintenance.\n");
        return output;
    }

    let counts: Vec<String> = StockStatus::ALL
        .iter()
        .filter(|s| s.needs_attention())
        .map(|s| {
            let n = alerts.iter().filter(|a| a.stock_status == *s).count();
            format!("{}: {}", s, n)
        })
        .collect();
    output.push_str(&format!("{}\n\n", counts.join(", ")));

    output.push_str(&markdown_table(
        &["Severity", "Part", "Current", "Min", "Reorder", "Need", "After", "Supplier"],
        alerts.iter().map(|a| {
            vec![
                a.stock_status.to_string(),
                a.part_number.clone(),
                a.current_stock.to_string(),
                a.minimum_stock.to_string(),
                a.reorder_point.to_string(),
                a.total_maintenance_need.to_string(),
                a.stock_after_maintenance.to_string(),
                a.supplier.clone().unwrap_or_else(|| "-".to_string()),
            ]
        }),
    ));
    output
}
