//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::core::Workspace;
use crate::generator::MAX_EQUIPMENT_ID;

pub const DEFAULT_EQUIPMENT_COUNT: u32 = 100;

/// maintkit configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database path, relative paths resolve against the workspace root
    pub database: Option<PathBuf>,

    /// Directory for generated manuals and parts lists
    pub manuals_dir: Option<PathBuf>,

    /// Number of pieces of equipment to generate
    pub equipment_count: Option<u32>,

    /// Delete existing manuals and parts before a load
    pub clear_existing: Option<bool>,

    /// Seed for stock population
    pub seed: Option<u64>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(workspace: Option<&Workspace>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (applied by the accessors)

        // 2. Global user config (~/.config/maintkit/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Workspace config (.maintkit/config.yaml)
        if let Some(workspace) = workspace {
            if let Some(local) = Self::read_file(&workspace.config_path()) {
                config.merge(local);
            }
        }

        // 4. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "maintkit")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        if contents
            .lines()
            .map(str::trim)
            .all(|l| l.is_empty() || l.starts_with('#'))
        {
            return None;
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Apply `MAINTKIT_*` overrides from a variable lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(database) = lookup("MAINTKIT_DATABASE") {
            self.database = Some(PathBuf::from(database));
        }
        if let Some(dir) = lookup("MAINTKIT_MANUALS_DIR") {
            self.manuals_dir = Some(PathBuf::from(dir));
        }
        if let Some(count) = lookup("MAINTKIT_EQUIPMENT_COUNT") {
            match count.trim().parse() {
                Ok(count) => self.equipment_count = Some(count),
                Err(_) => warn!(value = %count, "ignoring invalid MAINTKIT_EQUIPMENT_COUNT"),
            }
        }
        if let Some(seed) = lookup("MAINTKIT_SEED") {
            match seed.trim().parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => warn!(value = %seed, "ignoring invalid MAINTKIT_SEED"),
            }
        }
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.manuals_dir.is_some() {
            self.manuals_dir = other.manuals_dir;
        }
        if other.equipment_count.is_some() {
            self.equipment_count = other.equipment_count;
        }
        if other.clear_existing.is_some() {
            self.clear_existing = other.clear_existing;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Database path, falling back to the workspace default
    pub fn database_path(&self, workspace: Option<&Workspace>) -> Option<PathBuf> {
        match (&self.database, workspace) {
            (Some(path), Some(ws)) => Some(ws.resolve(path)),
            (Some(path), None) => Some(path.clone()),
            (None, Some(ws)) => Some(ws.default_database_path()),
            (None, None) => None,
        }
    }

    /// Manuals directory, falling back to the workspace default
    pub fn manuals_dir(&self, workspace: Option<&Workspace>) -> PathBuf {
        match (&self.manuals_dir, workspace) {
            (Some(path), Some(ws)) => ws.resolve(path),
            (Some(path), None) => path.clone(),
            (None, Some(ws)) => ws.default_manuals_dir(),
            (None, None) => PathBuf::from(crate::core::workspace::MANUALS_DIR),
        }
    }

    /// Equipment count, clamped to the id range
    pub fn equipment_count(&self) -> u32 {
        self.equipment_count
            .unwrap_or(DEFAULT_EQUIPMENT_COUNT)
            .clamp(1, MAX_EQUIPMENT_ID)
    }

    pub fn clear_existing(&self) -> bool {
        self.clear_existing.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.equipment_count(), 100);
        assert!(config.clear_existing());
        assert_eq!(config.database_path(None), None);
        assert_eq!(config.manuals_dir(None), PathBuf::from("service-manuals"));
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            equipment_count: Some(10),
            seed: Some(1),
            ..Default::default()
        };
        base.merge(Config {
            seed: Some(2),
            clear_existing: Some(false),
            ..Default::default()
        });
        assert_eq!(base.equipment_count, Some(10));
        assert_eq!(base.seed, Some(2));
        assert!(!base.clear_existing());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MAINTKIT_DATABASE", "/tmp/other.db"),
            ("MAINTKIT_EQUIPMENT_COUNT", "25"),
            ("MAINTKIT_SEED", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config {
            seed: Some(7),
            ..Default::default()
        };
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.database, Some(PathBuf::from("/tmp/other.db")));
        assert_eq!(config.equipment_count(), 25);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_equipment_count_is_clamped() {
        let config = Config {
            equipment_count: Some(5000),
            ..Default::default()
        };
        assert_eq!(config.equipment_count(), 999);
    }

    #[test]
    fn test_workspace_file_and_relative_paths() {
        let tmp = tempdir().unwrap();
        let workspace = Workspace::init(tmp.path()).unwrap();
        std::fs::write(
            workspace.config_path(),
            "database: data/maint.db\nequipment_count: 12\nclear_existing: false\n",
        )
        .unwrap();

        let config = Config::read_file(&workspace.config_path()).unwrap();
        assert_eq!(config.equipment_count(), 12);
        assert!(!config.clear_existing());
        assert_eq!(
            config.database_path(Some(&workspace)),
            Some(workspace.root().join("data/maint.db"))
        );
        assert_eq!(
            config.manuals_dir(Some(&workspace)),
            workspace.root().join("service-manuals")
        );
    }

    #[test]
    fn test_commented_default_config_is_empty() {
        let tmp = tempdir().unwrap();
        let workspace = Workspace::init(tmp.path()).unwrap();
        assert_eq!(Config::read_file(&workspace.config_path()), None);
    }
}
