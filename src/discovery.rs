//! Source discovery: expand a set of file and directory paths into an
//! ordered list of ingestible files.
//!
//! Missing paths are a warning, never an error; one bad argument must not
//! sink the rest of the run.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

use crate::types::IngestError;

/// Extensions ingested by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "mdx", "txt"];

/// Recursively collect files under `paths` whose extension is in
/// `extensions`.  Files are accepted directly, directories are walked, and
/// the result is sorted for deterministic run order.
pub async fn discover_files(
    paths: &[PathBuf],
    extensions: &[&str],
) -> Result<Vec<PathBuf>, IngestError> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            warn!(path = %path.display(), "path not found, skipping");
            continue;
        }
        if path.is_file() {
            if matches_extension(path, extensions) {
                files.push(path.clone());
            }
            continue;
        }

        // Iterative walk; directories we cannot read are warned about and
        // skipped, matching the non-fatal discovery policy.
        let mut pending = vec![path.clone()];
        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(dir = %dir.display(), %err, "unreadable directory, skipping");
                    continue;
                }
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(IngestError::from)?
            {
                let entry_path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry_path);
                } else if file_type.is_file() && matches_extension(&entry_path, extensions) {
                    files.push(entry_path);
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

fn matches_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}
