//! `maintkit generate` command - Write synthetic manuals and parts lists

use console::style;
use miette::Result;
use std::path::PathBuf;
use tracing::info;

use crate::cli::helpers::{plural, CommandContext};
use crate::cli::GlobalOpts;
use crate::generator::Corpus;

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// First equipment id
    #[arg(long, default_value_t = 1)]
    pub start: u32,

    /// Number of pieces of equipment (default: equipment_count from config)
    #[arg(long, short = 'n')]
    pub count: Option<u32>,

    /// Output directory (default: the workspace manuals directory)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CommandContext::resolve(global)?;
    let count = args.count.unwrap_or_else(|| ctx.config.equipment_count());
    let dir = ctx.manuals_dir(args.output);

    let corpus = Corpus::generate(args.start, count)?;
    let written = corpus.write_to(&dir)?;
    info!(equipment = corpus.len(), dir = %dir.display(), "corpus generated");

    if !global.quiet {
        println!(
            "{} Generated {} ({} files) in {}",
            style("✓").green(),
            plural(corpus.len(), "manual"),
            written.len(),
            style(dir.display()).cyan()
        );
        println!("  Part lines: {}", corpus.total_part_lines());
    }

    Ok(())
}
