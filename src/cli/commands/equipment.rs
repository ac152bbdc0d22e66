//! `maintkit equipment` command - Query loaded equipment

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::CommandContext;
use crate::cli::output::emit_structured;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::{ServiceManual, ServicePart};
use crate::core::MaintenanceStore;

#[derive(Subcommand, Debug)]
pub enum EquipmentCommands {
    /// List loaded equipment with parts count and total quantity
    List {
        /// Show only the first N pieces of equipment
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show a service manual and its parts
    Show {
        /// Equipment id
        id: u32,

        /// Print the full manual text
        #[arg(long)]
        content: bool,
    },

    /// List the parts a service consumes
    Parts {
        /// Equipment id
        id: u32,
    },
}

const LIST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 6),
    ColumnDef::new("description", "DESCRIPTION", 48),
    ColumnDef::new("parts", "PARTS", 6),
    ColumnDef::new("quantity", "QTY", 6),
];

const PART_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("part", "PART", 28),
    ColumnDef::new("quantity", "QTY", 6),
];

pub fn run(cmd: EquipmentCommands, global: &GlobalOpts) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;
    let store = ctx.open_store()?;
    let format = ctx.format(global, OutputFormat::Tsv);

    match cmd {
        EquipmentCommands::List { limit } => run_list(&store, limit, format),
        EquipmentCommands::Show { id, content } => run_show(&store, id, content, format),
        EquipmentCommands::Parts { id } => run_parts(&store, id, format),
    }
}

fn run_list(store: &MaintenanceStore, limit: Option<usize>, format: OutputFormat) -> Result<()> {
    let equipment = store.list_equipment(limit)?;
    if emit_structured(&equipment, format)? {
        return Ok(());
    }

    let rows = equipment.iter().map(|e| {
        TableRow::new()
            .cell("id", CellValue::Id(e.unique_id))
            .cell("description", CellValue::Text(e.service_description.clone()))
            .cell("parts", CellValue::Number(e.parts_count))
            .cell("quantity", CellValue::Number(e.total_quantity))
    });
    TableFormatter::new(LIST_COLUMNS, "equipment").output(rows, format);
    Ok(())
}

#[derive(Serialize)]
struct EquipmentDetail<'a> {
    #[serde(flatten)]
    manual: &'a ServiceManual,
    equipment_type: &'a str,
    parts: &'a [ServicePart],
}

fn run_show(store: &MaintenanceStore, id: u32, content: bool, format: OutputFormat) -> Result<()> {
    let manual = find_manual(store, id)?;
    let parts = store.parts_for_equipment(id)?;

    let detail = EquipmentDetail {
        manual: &manual,
        equipment_type: manual.equipment_type(),
        parts: &parts,
    };
    if emit_structured(&detail, format)? {
        return Ok(());
    }

    println!("{}", style(format!("Equipment {}", manual.unique_id)).bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Description:  {}", manual.service_description);
    println!("  Type:         {}", style(manual.equipment_type()).cyan());
    println!(
        "  Content hash: {}",
        manual.content_hash.as_deref().unwrap_or("-")
    );
    println!();

    let total: i64 = parts.iter().map(|p| p.quantity).sum();
    println!(
        "{} ({} lines, {} units)",
        style("Service parts").bold(),
        parts.len(),
        total
    );
    for part in &parts {
        println!("  {:<28} {:>4}", style(&part.part).cyan(), part.quantity);
    }

    if content {
        println!();
        match &manual.service_manual {
            Some(text) => println!("{}", text),
            None => println!("{}", style("(no manual text stored)").dim()),
        }
    }

    Ok(())
}

fn run_parts(store: &MaintenanceStore, id: u32, format: OutputFormat) -> Result<()> {
    find_manual(store, id)?;
    let parts = store.parts_for_equipment(id)?;
    if emit_structured(&parts, format)? {
        return Ok(());
    }

    let rows = parts.iter().map(|p| {
        TableRow::new()
            .cell("part", CellValue::Part(p.part.clone()))
            .cell("quantity", CellValue::Number(p.quantity))
    });
    TableFormatter::new(PART_COLUMNS, "part")
        .without_summary()
        .output(rows, format);
    Ok(())
}

fn find_manual(store: &MaintenanceStore, id: u32) -> Result<ServiceManual> {
    store.manual(id)?.ok_or_else(|| {
        miette::miette!(
            help = "run 'maintkit equipment list' to see loaded ids",
            "no equipment with id {}",
            id
        )
    })
}
