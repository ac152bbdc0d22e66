//! Cost analysis report: maintenance demand priced against stock

use miette::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::helpers::{format_money, CommandContext};
use crate::cli::OutputFormat;
use crate::core::store::{CostLine, CostScope};

use super::{heading, markdown_table, optional_money, render, write_output};

#[derive(clap::Args, Debug)]
#[command(group(clap::ArgGroup::new("scope").required(true).args(["equipment", "pattern"])))]
pub struct CostArgs {
    /// Price the parts of one piece of equipment
    #[arg(long, short = 'e')]
    pub equipment: Option<u32>,

    /// Price total demand for parts matching a pattern
    #[arg(long, short = 'p')]
    pub pattern: Option<String>,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Priced demand with its total and the parts that have no price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostAnalysis {
    pub scope: String,
    pub lines: Vec<CostLine>,
    pub total_cost: f64,
    pub unpriced: Vec<String>,
}

impl CostAnalysis {
    pub fn new(scope: String, lines: Vec<CostLine>) -> Self {
        let total_cost = lines.iter().filter_map(CostLine::line_cost).sum();
        let unpriced = lines
            .iter()
            .filter(|l| l.unit_cost.is_none())
            .map(|l| l.part.clone())
            .collect();
        Self {
            scope,
            lines,
            total_cost,
            unpriced,
        }
    }
}

pub fn run(args: CostArgs, ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let store = ctx.open_store()?;

    let (scope, label) = match (args.equipment, args.pattern) {
        (Some(id), _) => {
            if store.manual(id)?.is_none() {
                return Err(miette::miette!("no equipment with id {}", id));
            }
            (CostScope::Equipment(id), format!("equipment {}", id))
        }
        (None, Some(pattern)) => {
            let label = format!("parts matching '{}'", pattern);
            (CostScope::Pattern(pattern), label)
        }
        (None, None) => return Err(miette::miette!("pass --equipment or --pattern")),
    };

    let analysis = CostAnalysis::new(label, store.cost_analysis(&scope)?);
    let content = render(&analysis, format, || render_markdown(&analysis))?;
    write_output(&content, args.output)
}

pub(crate) fn render_markdown(analysis: &CostAnalysis) -> String {
    let mut output = heading(&format!("Cost Analysis: {}", analysis.scope));

    if analysis.lines.is_empty() {
        output.push_str("No maintenance parts match.\n");
        return output;
    }

    output.push_str(&markdown_table(
        &["Part", "Quantity", "Unit Cost", "Line Cost", "Supplier"],
        analysis.lines.iter().map(|l| {
            vec![
                l.part.clone(),
                l.quantity.to_string(),
                optional_money(l.unit_cost),
                optional_money(l.line_cost()),
                l.supplier.clone().unwrap_or_else(|| "-".to_string()),
            ]
        }),
    ));
    output.push_str(&format!("\n**Total cost: {}**\n", format_money(analysis.total_cost)));

    if !analysis.unpriced.is_empty() {
        output.push_str("\n## Missing Prices\n\n");
        output.push_str("These parts have no stock row and are not included in the total:\n\n");
        for part in &analysis.unpriced {
            output.push_str(&format!("- {}\n", part));
        }
    }

    output
}
