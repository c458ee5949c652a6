//! Quote import and export
//!
//! Exports are pretty-printed JSON arrays of `{text, category}` records.
//! Imports only check that the payload is a JSON array; the records inside
//! are appended as-is.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::Quote;
use crate::store::QuoteStore;

/// File name used for exports
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Render the whole collection as pretty-printed JSON
pub fn export_all(store: &QuoteStore) -> Result<String> {
    Ok(serde_json::to_string_pretty(store.quotes())?)
}

/// Write the export file into `dir`, returning its path
pub fn export_to_dir(store: &QuoteStore, dir: &Path) -> Result<PathBuf> {
    let json = export_all(store)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, json)?;
    info!("Exported {} quotes to {:?}", store.len(), path);
    Ok(path)
}

/// Parse an import payload into quotes
///
/// Fails with `Error::Format` unless the payload is a JSON array.
pub fn parse_import(raw: &str) -> Result<Vec<Quote>> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| Error::Format(format!("not valid JSON: {}", e)))?;

    match value {
        Value::Array(items) => Ok(items.iter().map(Quote::from_value_lossy).collect()),
        other => Err(Error::Format(format!(
            "expected an array of quotes, found {}",
            json_kind(&other)
        ))),
    }
}

/// Merge an import payload into the collection
///
/// Returns the number of quotes imported. On failure the collection is
/// left untouched.
pub fn import_merge(store: &mut QuoteStore, raw: &str) -> Result<usize> {
    let quotes = parse_import(raw)?;
    let count = store.merge_append(quotes)?;
    info!("Imported {} quotes", count);
    Ok(count)
}

/// Read `path` and merge its contents into the collection
pub fn import_from_path(store: &mut QuoteStore, path: &Path) -> Result<usize> {
    let raw = fs::read_to_string(path)?;
    import_merge(store, &raw)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
