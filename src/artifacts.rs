//! Per-document artifact files: the binary copy and the metadata copy.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ExportError;

/// Replace filesystem-hostile characters in a document title so it can be
/// used as a file stem. Titles are user-supplied and not guaranteed safe.
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '_' || c == '.' || c == ' ');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Create the tag-scoped export directory, purging anything left over from
/// a previous run. Deletes pre-existing contents unconditionally.
pub fn prepare_directory(output_root: &Path, tag: &str) -> Result<PathBuf, ExportError> {
    let dir = output_root.join(format!("export-{tag}"));
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
        debug!(path = %dir.display(), "Removed existing export directory");
    }
    fs::create_dir_all(&dir)?;
    info!(path = %dir.display(), "Prepared export directory");
    Ok(dir)
}

/// Write the document's binary copy next to its metadata.
pub fn write_pdf(dir: &Path, title: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{}.pdf", sanitize_title(title)));
    fs::write(&path, bytes)?;
    debug!(path = %path.display(), size = bytes.len(), "Wrote document PDF");
    Ok(path)
}

/// Write the document's full metadata record as pretty-printed JSON.
pub fn write_metadata(
    dir: &Path,
    title: &str,
    record: &serde_json::Value,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{}.json", sanitize_title(title)));
    let body = serde_json::to_string_pretty(record)?;
    fs::write(&path, body)?;
    debug!(path = %path.display(), "Wrote document metadata");
    Ok(path)
}
