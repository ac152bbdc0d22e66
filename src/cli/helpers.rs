//! Shared helper functions for CLI commands
//!
//! Workspace/config/database resolution and small string utilities used
//! across command modules.

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::debug;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, MaintenanceStore, Workspace, WorkspaceError};

/// Resolved workspace, configuration and database location for a command
pub struct CommandContext {
    pub workspace: Option<Workspace>,
    pub config: Config,
    pub database: Option<PathBuf>,
}

impl CommandContext {
    /// Resolve the workspace, layered config and database path
    ///
    /// `--database` always wins over the configured or workspace database.
    /// Outside a workspace with no database configured, only commands that
    /// never open the store can run.
    pub fn resolve(global: &GlobalOpts) -> Result<Self> {
        let workspace = match &global.workspace {
            Some(path) => Some(Workspace::at(path)?),
            None => match Workspace::discover() {
                Ok(ws) => Some(ws),
                Err(WorkspaceError::NotFound { .. }) => None,
                Err(e) => return Err(e.into()),
            },
        };

        let config = Config::load(workspace.as_ref());

        let database = global
            .database
            .clone()
            .or_else(|| config.database_path(workspace.as_ref()));

        if let Some(path) = &database {
            debug!(database = %path.display(), "resolved database");
        }
        Ok(Self {
            workspace,
            config,
            database,
        })
    }

    /// Open the database, creating the schema if needed
    pub fn open_store(&self) -> Result<MaintenanceStore> {
        let Some(database) = &self.database else {
            let cwd = std::env::current_dir().into_diagnostic()?;
            return Err(WorkspaceError::NotFound { searched_from: cwd }.into());
        };
        Ok(MaintenanceStore::open(database)?)
    }

    /// Directory holding generated manuals and parts lists
    pub fn manuals_dir(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit.unwrap_or_else(|| self.config.manuals_dir(self.workspace.as_ref()))
    }

    /// Output format: the flag, then the configured default, then `fallback`
    pub fn format(&self, global: &GlobalOpts, fallback: OutputFormat) -> OutputFormat {
        if global.format != OutputFormat::Auto {
            return global.format;
        }
        self.config
            .default_format
            .as_deref()
            .and_then(|f| f.parse::<OutputFormat>().ok())
            .unwrap_or(OutputFormat::Auto)
            .resolve(fallback)
    }
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Format a currency amount
pub fn format_money(value: f64) -> String {
    format!("${:.2}", value)
}

/// Singular or plural noun for a count
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("•••••", 4), "•...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_format_money_and_plural() {
        assert_eq!(format_money(12.5), "$12.50");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(plural(1, "part"), "1 part");
        assert_eq!(plural(3, "part"), "3 parts");
    }
}
