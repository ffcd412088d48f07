//! JSON file import and export.

use std::fs;
use std::path::Path;

use crate::domain::{AppError, Notice, Result};

use super::repository::QuoteRepository;

/// Default export file name.
pub const DEFAULT_EXPORT_FILE: &str = "quotes.json";

/// Write the full list as pretty JSON to `path`.
///
/// # Errors
/// Returns error if serialization or the file write fails.
pub fn export_to_file(repo: &QuoteRepository, path: &Path) -> Result<Notice> {
    let json = repo.export_json()?;

    fs::write(path, json)
        .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))?;

    tracing::info!(path = %path.display(), count = repo.len(), "Exported quotes");

    Ok(Notice::success(format!(
        "Exported {} quotes to {}",
        repo.len(),
        path.display()
    )))
}

/// Replace the list with the contents of the JSON file at `path`.
///
/// # Errors
/// Returns `AppError::Io` if the file cannot be read and
/// `AppError::ImportFormat` if it is not a JSON array. The
/// repository is unchanged on error.
pub fn import_from_file(repo: &mut QuoteRepository, path: &Path) -> Result<Notice> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Error reading file {}", path.display()), e))?;

    let count = repo.import_json(&content)?;

    Ok(Notice::success(format!(
        "Quotes imported successfully! ({count} quotes)"
    )))
}
