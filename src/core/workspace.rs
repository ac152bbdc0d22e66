//! Workspace discovery and structure

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Marker directory holding the workspace config and database
pub const WORKSPACE_DIR: &str = ".maintkit";

pub const CONFIG_FILE: &str = "config.yaml";

pub const DATABASE_FILE: &str = "maintkit.db";

/// Default directory for generated manuals, relative to the workspace root
pub const MANUALS_DIR: &str = "service-manuals";

/// A maintkit workspace
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Root directory of the workspace (parent of .maintkit/)
    root: PathBuf,
}

impl Workspace {
    /// Find workspace root by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current = std::env::current_dir().map_err(|e| WorkspaceError::Io(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find workspace root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::Io(e.to_string()))?;

        loop {
            if current.join(WORKSPACE_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Use the given directory as workspace root without searching
    pub fn at(root: &Path) -> Result<Self, WorkspaceError> {
        let root = root
            .canonicalize()
            .map_err(|e| WorkspaceError::Io(e.to_string()))?;
        if !root.join(WORKSPACE_DIR).is_dir() {
            return Err(WorkspaceError::NotFound {
                searched_from: root,
            });
        }
        Ok(Self { root })
    }

    /// Create a new workspace at the given path
    pub fn init(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(WORKSPACE_DIR).exists() {
            return Err(WorkspaceError::AlreadyExists(root));
        }

        Self::create(root)
    }

    /// Initialize even if .maintkit/ exists, rewriting the default config
    pub fn init_force(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create(root)
    }

    fn create(root: PathBuf) -> Result<Self, WorkspaceError> {
        let dir = root.join(WORKSPACE_DIR);
        std::fs::create_dir_all(&dir).map_err(|e| WorkspaceError::Io(e.to_string()))?;
        std::fs::write(dir.join(CONFIG_FILE), Self::default_config())
            .map_err(|e| WorkspaceError::Io(e.to_string()))?;
        std::fs::create_dir_all(root.join(MANUALS_DIR))
            .map_err(|e| WorkspaceError::Io(e.to_string()))?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# maintkit workspace configuration

# SQLite database, relative to the workspace root
# database: .maintkit/maintkit.db

# Directory for generated manuals and parts lists
# manuals_dir: service-manuals

# Number of pieces of equipment to generate (at most 999)
# equipment_count: 100

# Delete existing manuals and parts before a load
# clear_existing: true

# Seed for stock population, random when unset
# seed: 42

# Default output format (auto, tsv, json, yaml, csv, md)
# default_format: auto
"#
    }

    /// Get the workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .maintkit directory
    pub fn dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir().join(CONFIG_FILE)
    }

    pub fn default_database_path(&self) -> PathBuf {
        self.dir().join(DATABASE_FILE)
    }

    pub fn default_manuals_dir(&self) -> PathBuf {
        self.root.join(MANUALS_DIR)
    }

    /// Resolve a configured path against the workspace root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Errors that can occur during workspace operations
#[derive(Debug, Error, Diagnostic)]
pub enum WorkspaceError {
    #[error("not a maintkit workspace (searched from {searched_from:?})")]
    #[diagnostic(
        code(maintkit::workspace::not_found),
        help("run 'maintkit init' to create one, or pass --database")
    )]
    NotFound { searched_from: PathBuf },

    #[error("maintkit workspace already exists at {0:?}")]
    #[diagnostic(code(maintkit::workspace::exists), help("use --force to reinitialize"))]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_workspace_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let workspace = Workspace::init(tmp.path()).unwrap();

        assert!(workspace.dir().is_dir());
        assert!(workspace.config_path().exists());
        assert!(workspace.default_manuals_dir().is_dir());
        assert_eq!(
            workspace.default_database_path(),
            workspace.root().join(".maintkit/maintkit.db")
        );
    }

    #[test]
    fn test_workspace_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Workspace::init(tmp.path()).unwrap();

        let err = Workspace::init(tmp.path()).unwrap_err();
        assert!(matches!(err, WorkspaceError::AlreadyExists(_)));
        assert!(Workspace::init_force(tmp.path()).is_ok());
    }

    #[test]
    fn test_workspace_discover_from_nested_dir() {
        let tmp = tempdir().unwrap();
        Workspace::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let workspace = Workspace::discover_from(&subdir).unwrap();
        assert_eq!(workspace.root(), tmp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_workspace_discover_fails_without_marker() {
        let tmp = tempdir().unwrap();
        let err = Workspace::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, WorkspaceError::NotFound { .. }));
        assert!(Workspace::at(tmp.path()).is_err());
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let tmp = tempdir().unwrap();
        let workspace = Workspace::init(tmp.path()).unwrap();
        assert_eq!(
            workspace.resolve(Path::new("data/db.sqlite")),
            workspace.root().join("data/db.sqlite")
        );
        assert_eq!(workspace.resolve(Path::new("/tmp/x.db")), PathBuf::from("/tmp/x.db"));
    }
}
