//! `maintkit update-content` command - Refresh stored manual text from disk

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{plural, CommandContext};
use crate::cli::GlobalOpts;
use crate::generator::Corpus;

#[derive(clap::Args, Debug)]
pub struct UpdateContentArgs {
    /// Directory of manual/parts pairs (default: the workspace manuals directory)
    #[arg(long)]
    pub from: Option<PathBuf>,
}

pub fn run(args: UpdateContentArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;
    let dir = ctx.manuals_dir(args.from);
    let corpus = Corpus::read_from(&dir)?;

    let manuals: Vec<_> = corpus.equipment.into_iter().map(|e| e.manual).collect();
    let mut store = ctx.open_store()?;
    let stats = store.update_manual_content(&manuals)?;

    if global.quiet {
        return Ok(());
    }

    println!(
        "{} Updated {}, {} unchanged",
        style("✓").green(),
        plural(stats.updated, "manual"),
        stats.unchanged
    );
    if !stats.missing.is_empty() {
        let ids: Vec<String> = stats.missing.iter().map(u32::to_string).collect();
        println!(
            "{} No stored manual for {}: {}",
            style("!").yellow(),
            plural(stats.missing.len(), "id"),
            ids.join(", ")
        );
    }

    Ok(())
}
