//! Import and export command handlers

use std::path::Path;

use anyhow::{Context, Result};

use quotebook_core::{App, RemoteSource};

use crate::output::Output;

/// Export all quotes to `quotes.json` in `dir`
pub async fn export<R: RemoteSource>(app: &App<R>, dir: &Path, output: &Output) -> Result<()> {
    let path = app
        .export_to_dir(dir)
        .await
        .with_context(|| format!("Failed to export to {:?}", dir))?;
    output.success(&format!("Exported quotes to {}", path.display()));
    Ok(())
}

/// Import quotes from a JSON file
pub async fn import<R: RemoteSource>(app: &App<R>, file: &Path, output: &Output) -> Result<()> {
    let count = app
        .import_file(file)
        .await
        .with_context(|| format!("Failed to import {:?}", file))?;
    output.success(&format!("Imported {} quote(s)", count));
    Ok(())
}
