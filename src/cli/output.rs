//! Structured (JSON/YAML) output shared by list and report commands

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Render `value` as JSON or YAML, `None` for the tabular formats
pub fn render_structured<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
) -> Result<Option<String>> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(value).into_diagnostic()?;
            json.push('\n');
            Ok(Some(json))
        }
        OutputFormat::Yaml => Ok(Some(serde_yml::to_string(value).into_diagnostic()?)),
        _ => Ok(None),
    }
}

/// Print `value` as JSON or YAML
///
/// Returns `false` without printing for the tabular formats, leaving the
/// caller to render a table.
pub fn emit_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
    match render_structured(value, format)? {
        Some(text) => {
            print!("{}", text);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Rows of string cells as JSON objects keyed by column name
pub fn rows_as_objects(columns: &[String], rows: &[Vec<String>]) -> Vec<serde_json::Value> {
    rows.iter()
        .map(|row| {
            let obj: serde_json::Map<String, serde_json::Value> = columns
                .iter()
                .zip(row)
                .map(|(col, val)| (col.clone(), serde_json::Value::String(val.clone())))
                .collect();
            serde_json::Value::Object(obj)
        })
        .collect()
}
