//! SQLite store for maintenance manuals, service parts and procurement stock
//!
//! Two namespaces share one database file, told apart by table prefix:
//! - `maintenance_*` holds service manuals and the parts each service consumes
//! - `procurement_*` holds stock levels and the reconciliation view
//!
//! Foreign keys are enabled on every connection so deleting a manual
//! cascades to its parts.

mod error;
mod load;
mod queries;
pub mod schema;
mod types;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use load::LoadBatch;
pub use types::*;

use std::fs;
use std::path::Path;

use rusqlite::Connection;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Current schema version, stored in `schema_version`
pub const SCHEMA_VERSION: i32 = 1;

/// The maintenance and procurement database
pub struct MaintenanceStore {
    conn: Connection,
}

impl MaintenanceStore {
    /// Open or create a database file, creating the schema if needed
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Schema(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened database");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: ":memory:".into(),
            source,
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| StoreError::Schema(e.to_string()))?;

        let mut store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }
}

/// SHA-256 of manual content, hex encoded
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Turn a user pattern into a LIKE pattern
///
/// `*` becomes `%`; a pattern without wildcards matches as a substring.
pub fn like_pattern(pattern: &str) -> String {
    let pattern = pattern.trim().replace('*', "%");
    if pattern.contains('%') {
        pattern
    } else {
        format!("%{}%", pattern)
    }
}
