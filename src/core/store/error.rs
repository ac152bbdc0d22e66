//! Store error types

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("cannot open database {path:?}")]
    #[diagnostic(code(maintkit::store::open))]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("schema error: {0}")]
    #[diagnostic(
        code(maintkit::store::schema),
        help("recreate the database with 'maintkit init --force'")
    )]
    Schema(String),

    #[error("constraint violation in {table} for {row}")]
    #[diagnostic(
        code(maintkit::store::constraint),
        help("the whole batch was rolled back, nothing was written")
    )]
    ConstraintViolation {
        table: &'static str,
        row: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("only read-only statements are allowed: {0}")]
    #[diagnostic(code(maintkit::store::read_only))]
    NotReadOnly(String),

    #[error("database error: {0}")]
    #[diagnostic(code(maintkit::store::query))]
    Query(#[from] rusqlite::Error),
}

impl StoreError {
    /// Wrap a failed write, keeping constraint failures apart from other errors
    pub(crate) fn on_write(
        err: rusqlite::Error,
        table: &'static str,
        row: impl FnOnce() -> String,
    ) -> Self {
        let is_constraint = matches!(
            &err,
            rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
        );
        if is_constraint {
            StoreError::ConstraintViolation {
                table,
                row: row(),
                source: err,
            }
        } else {
            StoreError::Query(err)
        }
    }
}
