//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, db::DbCommands, equipment::EquipmentCommands,
    generate::GenerateArgs, init::InitArgs, load::LoadArgs, report::ReportCommands,
    stock::StockCommands, update_content::UpdateContentArgs,
};

#[derive(Parser)]
#[command(name = "maintkit")]
#[command(author, version, about = "Maintenance & procurement seeding kit")]
#[command(long_about = "Generate synthetic service manuals and parts lists, load them into SQLite, and reconcile procurement stock against maintenance demand.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace root (default: auto-detect by finding .maintkit/)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// SQLite database file (overrides workspace and config)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new maintkit workspace
    Init(InitArgs),

    /// Write synthetic manuals and parts lists to disk
    Generate(GenerateArgs),

    /// Load manuals and parts into the database
    Load(LoadArgs),

    /// Refresh stored manual text from disk
    UpdateContent(UpdateContentArgs),

    /// Query loaded equipment
    #[command(subcommand)]
    Equipment(EquipmentCommands),

    /// Procurement stock management
    #[command(subcommand)]
    Stock(StockCommands),

    /// Generate reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Inspect the database
    #[command(subcommand)]
    Db(DbCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Auto-detect based on context (tsv for lists, markdown for reports)
    #[default]
    Auto,
    /// YAML format
    Yaml,
    /// Tab-separated values
    Tsv,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Markdown table
    Md,
}

impl OutputFormat {
    /// Resolve `Auto` to a concrete format
    pub fn resolve(self, fallback: OutputFormat) -> OutputFormat {
        match self {
            OutputFormat::Auto => fallback,
            other => other,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
    }
}
