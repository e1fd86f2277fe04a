//! JSON file import and export.

use super::{ImportReport, QuoteStore};
use crate::error::QuoteError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Default export file name
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Write the whole store to `path` as a pretty-printed JSON array.
///
/// Overwrites any existing file. Returns the number of quotes written.
pub fn export_to_file(store: &QuoteStore, path: &Path) -> Result<usize> {
    let bytes = store.export()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory: {}", parent.display()))?;
    }

    fs::write(path, bytes)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    tracing::info!(path = %path.display(), count = store.len(), "quotes exported");
    Ok(store.len())
}

/// Read `path` and merge its quotes into the store
pub fn import_from_file(store: &mut QuoteStore, path: &Path) -> Result<ImportReport, QuoteError> {
    let bytes = fs::read(path).map_err(|e| {
        QuoteError::Format(format!("cannot read {}: {e}", path.display()))
    })?;

    store.import(&bytes)
}

/// One-line summary of an import, suitable for a notification
pub fn describe_import(report: &ImportReport) -> String {
    let mut message = match report.added {
        1 => "Imported 1 new quote".to_string(),
        n => format!("Imported {n} new quotes"),
    };
    match report.skipped {
        0 => {}
        1 => message.push_str(" (1 invalid entry skipped)"),
        n => message.push_str(&format!(" ({n} invalid entries skipped)")),
    }
    message
}
