//! `maintkit load` command - Load manuals and parts into the database

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{plural, truncate_str, CommandContext};
use crate::cli::GlobalOpts;
use crate::core::store::{LoadBatch, LoadOptions};
use crate::core::MaintenanceStore;
use crate::generator::Corpus;

/// Equipment shown after a successful load
const SAMPLE_SIZE: usize = 5;

#[derive(clap::Args, Debug)]
pub struct LoadArgs {
    /// Directory of `{id}_manual.md` / `{id}_parts.txt` pairs
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Generate a fresh corpus into the directory before loading
    #[arg(long)]
    pub generate: bool,

    /// Number of pieces of equipment to generate with --generate
    #[arg(long, short = 'n', requires = "generate")]
    pub count: Option<u32>,

    /// Keep existing manuals and parts instead of replacing them
    #[arg(long)]
    pub keep_existing: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(args: LoadArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;
    let dir = ctx.manuals_dir(args.from);

    let corpus = if args.generate {
        let count = args.count.unwrap_or_else(|| ctx.config.equipment_count());
        Corpus::generate(1, count)?
    } else {
        Corpus::read_from(&dir)?
    };

    if corpus.is_empty() {
        return Err(miette::miette!(
            help = "run 'maintkit generate' or pass --generate",
            "no manual/parts pairs found in {}",
            dir.display()
        ));
    }

    let clear_existing = !args.keep_existing && ctx.config.clear_existing();
    let mut store = ctx.open_store()?;

    if clear_existing && !args.yes && !confirm_replace(&store)? {
        println!("Aborted.");
        return Ok(());
    }

    // Generated files land on disk only once the load is going ahead
    if args.generate {
        corpus.write_to(&dir)?;
    }

    let batch = LoadBatch::from_corpus(&corpus);
    let stats = store.load(&batch, LoadOptions { clear_existing })?;

    if global.quiet {
        return Ok(());
    }

    if stats.cleared_manuals > 0 || stats.cleared_parts > 0 {
        println!(
            "{} Cleared {} and {}",
            style("✓").green(),
            plural(stats.cleared_manuals, "manual"),
            plural(stats.cleared_parts, "part row")
        );
    }
    println!(
        "{} Loaded {} and {} from {}",
        style("✓").green(),
        plural(stats.manuals, "manual"),
        plural(stats.parts, "part row"),
        style(dir.display()).cyan()
    );

    let sample = store.list_equipment(Some(SAMPLE_SIZE))?;
    if !sample.is_empty() {
        println!();
        println!("{}", style("Sample equipment").bold());
        for item in &sample {
            println!(
                "  {:>4}  {:<40} {} parts, {} units",
                style(item.unique_id).cyan(),
                truncate_str(&item.service_description, 40),
                item.parts_count,
                item.total_quantity
            );
        }
    }

    Ok(())
}

/// Ask before replacing loaded equipment; empty databases need no prompt
fn confirm_replace(store: &MaintenanceStore) -> Result<bool> {
    let existing = store.list_equipment(Some(1))?;
    if existing.is_empty() {
        return Ok(true);
    }

    if !console::user_attended() {
        return Err(miette::miette!(
            help = "pass --yes to replace without prompting, or --keep-existing",
            "refusing to replace loaded equipment without confirmation"
        ));
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Replace all loaded manuals and parts?")
        .default(false)
        .interact()
        .into_diagnostic()
}
