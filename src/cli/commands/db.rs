//! `maintkit db` command - Inspect the database
//!
//! `check` verifies the schema version and lists every table and the
//! reconciliation view with their columns and row counts. `query` runs
//! read-only SQL; write statements are rejected before execution.

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{escape_csv, CommandContext};
use crate::cli::output::{emit_structured, rows_as_objects};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::SCHEMA_VERSION;

#[derive(Subcommand, Debug)]
pub enum DbCommands {
    /// Verify the schema and show tables, columns and row counts
    Check,

    /// Execute SQL query against the database (read-only)
    Query {
        /// SQL query to execute
        sql: String,
    },
}

pub fn run(cmd: DbCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DbCommands::Check => run_check(global),
        DbCommands::Query { sql } => run_query(&sql, global),
    }
}

fn run_check(global: &GlobalOpts) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;
    let store = ctx.open_store()?;
    let version = store.schema_version()?;
    let relations = store.describe()?;

    if emit_structured(&relations, ctx.format(global, OutputFormat::Tsv))? {
        return Ok(());
    }

    println!(
        "{} Schema version {} (expected {})",
        style("✓").green(),
        style(version).cyan(),
        SCHEMA_VERSION
    );
    if let Some(database) = &ctx.database {
        println!("  Location: {}", database.display());
    }

    for relation in &relations {
        println!();
        println!(
            "{} {} ({} rows)",
            style(&relation.name).bold(),
            style(&relation.kind).dim(),
            style(relation.rows).cyan()
        );
        for column in &relation.columns {
            let mut flags = Vec::new();
            if column.primary_key {
                flags.push("pk");
            }
            if column.not_null {
                flags.push("not null");
            }
            println!(
                "    {:<28} {:<10} {}",
                column.name,
                column.decl_type,
                style(flags.join(", ")).dim()
            );
        }
    }

    Ok(())
}

fn run_query(sql: &str, global: &GlobalOpts) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;
    let store = ctx.open_store()?;

    let rows = store.query_raw(sql)?;
    let columns = store.query_columns(sql)?;

    match ctx.format(global, OutputFormat::Tsv) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            emit_structured(&rows_as_objects(&columns, &rows), format)?;
        }
        OutputFormat::Csv => {
            println!("{}", columns.iter().map(|c| escape_csv(c)).collect::<Vec<_>>().join(","));
            for row in rows {
                println!("{}", row.iter().map(|s| escape_csv(s)).collect::<Vec<_>>().join(","));
            }
        }
        OutputFormat::Md => {
            println!("| {} |", columns.join(" | "));
            println!("|{}|", vec!["---"; columns.len()].join("|"));
            for row in rows {
                let cells: Vec<String> = row.iter().map(|s| s.replace('|', "\\|")).collect();
                println!("| {} |", cells.join(" | "));
            }
        }
        _ => {
            println!("{}", columns.join("\t"));
            for row in rows {
                println!("{}", row.join("\t"));
            }
        }
    }

    Ok(())
}
