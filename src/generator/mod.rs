//! Seed data generation - service manuals and parts lists

pub mod archetype;
pub mod corpus;
pub mod manual;
pub mod parts;

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

pub use archetype::{Archetype, MaintenanceSchedule, ARCHETYPES};
pub use corpus::{Corpus, GeneratedEquipment, MAX_EQUIPMENT_ID};
pub use manual::{extract_equipment_type, ManualDocument, ManualGenerator};
pub use parts::{PartLine, PartsList};

/// Errors raised while generating or reading seed files
#[derive(Debug, Error, Diagnostic)]
pub enum GeneratorError {
    #[error("template error: {0}")]
    #[diagnostic(code(maintkit::generator::template))]
    Template(String),

    #[error("invalid parts line {line}: {message}")]
    #[diagnostic(code(maintkit::generator::parts))]
    InvalidPartsLine { line: usize, message: String },

    #[error("invalid parts file {path:?}, line {line}: {message}")]
    #[diagnostic(code(maintkit::generator::parts))]
    InvalidPartsFile {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("equipment range {start}..+{count} is outside 1..={max}", max = MAX_EQUIPMENT_ID)]
    #[diagnostic(
        code(maintkit::generator::range),
        help("equipment ids are three digits in part identifiers")
    )]
    InvalidRange { start: u32, count: u32 },

    #[error("manuals directory not found: {0:?}")]
    #[diagnostic(
        code(maintkit::generator::missing_dir),
        help("run 'maintkit generate' first")
    )]
    MissingDirectory(PathBuf),

    #[error("IO error on {path:?}: {message}")]
    Io { path: PathBuf, message: String },
}

impl GeneratorError {
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}
