//! `maintkit init` command - Initialize a new workspace

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::core::workspace::{CONFIG_FILE, DATABASE_FILE, MANUALS_DIR, WORKSPACE_DIR};
use crate::core::{MaintenanceStore, Workspace, WorkspaceError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Reinitialize an existing workspace, recreating its database
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let workspace = if args.force {
        Workspace::init_force(&path)
    } else {
        Workspace::init(&path)
    };

    match workspace {
        Ok(workspace) => {
            let database = workspace.default_database_path();
            if args.force {
                remove_database(&database)?;
            }
            MaintenanceStore::open(&database)?;

            println!(
                "{} Initialized maintkit workspace at {}",
                style("✓").green(),
                style(workspace.root().display()).cyan()
            );
            println!();
            println!("Created workspace structure:");
            print_structure(workspace.root());
            println!();
            println!("Next steps:");
            println!(
                "  {} Generate and load sample equipment",
                style("maintkit load --generate").yellow()
            );
            println!(
                "  {} Create stock for every referenced part",
                style("maintkit stock populate").yellow()
            );
            println!(
                "  {} Reconcile stock against maintenance demand",
                style("maintkit report reconcile").yellow()
            );
            Ok(())
        }
        Err(WorkspaceError::AlreadyExists(path)) => {
            println!(
                "{} maintkit workspace already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("maintkit init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn remove_database(database: &Path) -> Result<()> {
    if database.exists() {
        std::fs::remove_file(database).into_diagnostic()?;
        let _ = std::fs::remove_file(database.with_extension("db-journal"));
        let _ = std::fs::remove_file(database.with_extension("db-wal"));
        println!(
            "{} Removed existing database {}",
            style("✓").green(),
            style(database.display()).cyan()
        );
    }
    Ok(())
}

fn print_structure(root: &Path) {
    let entries = [
        format!("{}/", WORKSPACE_DIR),
        format!("{}/{}", WORKSPACE_DIR, CONFIG_FILE),
        format!("{}/{}", WORKSPACE_DIR, DATABASE_FILE),
        format!("{}/", MANUALS_DIR),
    ];

    for entry in &entries {
        if root.join(entry).exists() {
            println!("  {}", style(entry).dim());
        }
    }
}
