//! `maintkit stock` command - Procurement stock management
//!
//! Populates stock for every part maintenance references, lists and
//! summarizes stock levels, and checks free-text parts requests against
//! stock to plan orders.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::helpers::{format_money, plural, CommandContext};
use crate::cli::output::emit_structured;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::PopulateOptions;
use crate::core::{MaintenanceStore, StockItem};
use crate::procurement::{check_line, parse_request, plan_order, RequestLine};

#[derive(Subcommand, Debug)]
pub enum StockCommands {
    /// Create a stock row for every part referenced by maintenance
    Populate {
        /// Delete all existing stock first
        #[arg(long)]
        replace: bool,

        /// Seed for reproducible stock levels (default: seed from config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List stock rows
    List {
        /// Part-number pattern (`*` wildcard, substring without one)
        #[arg(long, short = 'p')]
        pattern: Option<String>,
    },

    /// Stock level overview and the lowest items
    Summary,

    /// Check a parts request against stock
    Check {
        /// Request file, or `-` for stdin
        file: PathBuf,
    },

    /// Plan a procurement order for a parts request
    Order {
        /// Request file, or `-` for stdin
        file: PathBuf,
    },

    /// Set the current stock level of a part
    Set {
        /// Part number
        part: String,

        /// New current stock
        #[arg(value_parser = clap::value_parser!(i64).range(0..))]
        quantity: i64,
    },
}

const STOCK_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("part_number", "PART", 22),
    ColumnDef::new("description", "DESCRIPTION", 34),
    ColumnDef::new("current", "CURRENT", 8),
    ColumnDef::new("minimum", "MIN", 5),
    ColumnDef::new("reorder", "REORDER", 8),
    ColumnDef::new("unit_cost", "COST", 9),
    ColumnDef::new("supplier", "SUPPLIER", 24),
];

const CHECK_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("part_number", "PART", 22),
    ColumnDef::new("description", "DESCRIPTION", 34),
    ColumnDef::new("needed", "NEEDED", 7),
    ColumnDef::new("current", "CURRENT", 8),
    ColumnDef::new("status", "STATUS", 13),
];

const ORDER_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("part_number", "PART", 22),
    ColumnDef::new("needed", "NEEDED", 7),
    ColumnDef::new("current", "CURRENT", 8),
    ColumnDef::new("order", "ORDER", 6),
    ColumnDef::new("unit_cost", "COST", 9),
    ColumnDef::new("line_cost", "TOTAL", 10),
    ColumnDef::new("supplier", "SUPPLIER", 24),
];

pub fn run(cmd: StockCommands, global: &GlobalOpts) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;
    let mut store = ctx.open_store()?;
    let format = ctx.format(global, OutputFormat::Tsv);

    match cmd {
        StockCommands::Populate { replace, seed } => {
            run_populate(&mut store, replace, seed.or(ctx.config.seed), global)
        }
        StockCommands::List { pattern } => run_list(&store, pattern.as_deref(), format),
        StockCommands::Summary => run_summary(&store, format),
        StockCommands::Check { file } => run_check(&store, &file, format),
        StockCommands::Order { file } => run_order(&store, &file, format),
        StockCommands::Set { part, quantity } => run_set(&mut store, &part, quantity, global),
    }
}

fn run_populate(
    store: &mut MaintenanceStore,
    replace: bool,
    seed: Option<u64>,
    global: &GlobalOpts,
) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let stats = store.populate_stock(&mut rng, PopulateOptions { replace })?;

    if global.quiet {
        return Ok(());
    }

    if stats.distinct_parts == 0 {
        println!(
            "{} No maintenance parts loaded; run {} first",
            style("!").yellow(),
            style("maintkit load").yellow()
        );
        return Ok(());
    }

    if replace {
        println!(
            "{} Cleared {}",
            style("✓").green(),
            plural(stats.cleared, "stock row")
        );
    }
    println!(
        "{} Populated stock for {} ({} already stocked)",
        style("✓").green(),
        plural(stats.inserted, "part"),
        stats.existing
    );
    if stats.skipped_blank > 0 {
        println!(
            "{} Skipped {}",
            style("!").yellow(),
            plural(stats.skipped_blank, "blank part identifier")
        );
    }
    Ok(())
}

fn stock_row(item: &StockItem) -> TableRow {
    TableRow::new()
        .cell("part_number", CellValue::Part(item.part_number.clone()))
        .cell("description", CellValue::Text(item.description().to_string()))
        .cell("current", CellValue::Number(item.current_stock))
        .cell("minimum", CellValue::Number(item.minimum_stock))
        .cell("reorder", CellValue::Number(item.reorder_point))
        .cell("unit_cost", CellValue::Money(Some(item.unit_cost)))
        .cell(
            "supplier",
            item.supplier
                .clone()
                .map_or(CellValue::Empty, CellValue::Text),
        )
}

fn run_list(store: &MaintenanceStore, pattern: Option<&str>, format: OutputFormat) -> Result<()> {
    let items = store.list_stock(pattern)?;
    if emit_structured(&items, format)? {
        return Ok(());
    }

    TableFormatter::new(STOCK_COLUMNS, "stock row").output(items.iter().map(stock_row), format);
    Ok(())
}

fn run_summary(store: &MaintenanceStore, format: OutputFormat) -> Result<()> {
    let summary = store.stock_summary()?;
    if emit_structured(&summary, format)? {
        return Ok(());
    }

    println!("{}", style("Stock Summary").bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  Total parts:     {}", style(summary.total_parts).cyan());
    println!("  In stock:        {}", style(summary.in_stock).green());
    println!("  Low stock:       {}", style(summary.low_stock).yellow());
    println!("  Out of stock:    {}", style(summary.out_of_stock).red());
    println!(
        "  Inventory value: {}",
        style(format_money(summary.inventory_value)).cyan()
    );

    if !summary.lowest.is_empty() {
        println!();
        println!("{}", style("At or below reorder point").bold());
        TableFormatter::new(STOCK_COLUMNS, "stock row")
            .without_summary()
            .output(summary.lowest.iter().map(stock_row), format);
    }
    Ok(())
}

/// Request lines with the stock row of each, if any
fn load_request(
    store: &MaintenanceStore,
    file: &Path,
) -> Result<(Vec<RequestLine>, Vec<Option<StockItem>>)> {
    let text = read_request(file)?;
    let lines = parse_request(&text)?;
    let stock = lines
        .iter()
        .map(|l| store.stock_item(&l.part_number))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((lines, stock))
}

fn read_request(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .into_diagnostic()?;
        Ok(text)
    } else {
        std::fs::read_to_string(file)
            .into_diagnostic()
            .map_err(|e| e.wrap_err(format!("cannot read {}", file.display())))
    }
}

fn run_check(store: &MaintenanceStore, file: &Path, format: OutputFormat) -> Result<()> {
    let (lines, stock) = load_request(store, file)?;
    let checks: Vec<_> = lines
        .iter()
        .zip(&stock)
        .map(|(line, item)| check_line(line, item.as_ref()))
        .collect();

    if emit_structured(&checks, format)? {
        return Ok(());
    }

    let rows = checks.iter().map(|c| {
        TableRow::new()
            .cell("part_number", CellValue::Part(c.part_number.clone()))
            .cell("description", CellValue::Text(c.description.clone()))
            .cell("needed", CellValue::Number(c.needed))
            .cell("current", CellValue::Number(c.current_stock))
            .cell("status", CellValue::Availability(c.status))
    });
    TableFormatter::new(CHECK_COLUMNS, "request line").output(rows, format);

    let short = checks.iter().filter(|c| c.needs_order()).count();
    if short > 0 && matches!(format, OutputFormat::Tsv) {
        println!(
            "{} {} cannot be filled from stock; run {}",
            style("!").yellow(),
            plural(short, "line"),
            style("maintkit stock order").yellow()
        );
    }
    Ok(())
}

fn run_order(store: &MaintenanceStore, file: &Path, format: OutputFormat) -> Result<()> {
    let (lines, stock) = load_request(store, file)?;
    let order = plan_order(lines.iter().zip(stock.iter().map(Option::as_ref)));

    if emit_structured(&order, format)? {
        return Ok(());
    }

    if order.is_empty() {
        println!("{} No order needed, all parts in stock", style("✓").green());
        return Ok(());
    }

    let rows = order.lines.iter().map(|l| {
        TableRow::new()
            .cell("part_number", CellValue::Part(l.part_number.clone()))
            .cell("needed", CellValue::Number(l.needed))
            .cell("current", CellValue::Number(l.current_stock))
            .cell("order", CellValue::Number(l.order_quantity))
            .cell("unit_cost", CellValue::Money(l.unit_cost))
            .cell("line_cost", CellValue::Money(l.line_cost()))
            .cell(
                "supplier",
                l.supplier.clone().map_or(CellValue::Empty, CellValue::Text),
            )
    });
    TableFormatter::new(ORDER_COLUMNS, "order line")
        .without_summary()
        .output(rows, format);

    if matches!(format, OutputFormat::Tsv) {
        println!();
        println!(
            "Total order cost: {}",
            style(format_money(order.total_cost())).cyan().bold()
        );
        let unpriced = order.unpriced_lines();
        if unpriced > 0 {
            println!(
                "{} {} not in the system, cost unknown",
                style("!").yellow(),
                plural(unpriced, "part")
            );
        }
    }
    Ok(())
}

fn run_set(
    store: &mut MaintenanceStore,
    part: &str,
    quantity: i64,
    global: &GlobalOpts,
) -> Result<()> {
    let part = part.trim().to_uppercase();
    if !store.set_current_stock(&part, quantity)? {
        return Err(miette::miette!(
            help = "run 'maintkit stock populate' to create stock rows",
            "no stock row for {}",
            part
        ));
    }

    if !global.quiet {
        println!(
            "{} {} current stock set to {}",
            style("✓").green(),
            style(&part).cyan(),
            quantity
        );
    }
    Ok(())
}
